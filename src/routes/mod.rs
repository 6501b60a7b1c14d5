pub mod reservation_routes;
