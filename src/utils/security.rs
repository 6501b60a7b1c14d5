//! Utilidades de seguridad

/// Comparación de secretos en tiempo constante.
///
/// Si las longitudes coinciden se recorren siempre todos los bytes, de modo
/// que el coste no depende de la posición de la primera diferencia.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hint::black_box;
    use std::time::{Duration, Instant};

    #[test]
    fn test_equal_keys() {
        assert!(constant_time_eq("s3cr3t-key", "s3cr3t-key"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_different_keys() {
        assert!(!constant_time_eq("s3cr3t-key", "s3cr3t-kex"));
        assert!(!constant_time_eq("s3cr3t-key", "x3cr3t-key"));
        assert!(!constant_time_eq("s3cr3t-key", "s3cr3t-key-longer"));
        assert!(!constant_time_eq("s3cr3t-key", ""));
    }

    fn time_comparisons(secret: &str, candidate: &str, rounds: usize) -> Duration {
        let start = Instant::now();
        for _ in 0..rounds {
            black_box(constant_time_eq(black_box(secret), black_box(candidate)));
        }
        start.elapsed()
    }

    // Aproximado: solo detecta diferencias groseras (p.ej. salida temprana)
    #[test]
    fn test_timing_independent_of_first_difference() {
        let secret = "a".repeat(4096);
        let early = format!("b{}", "a".repeat(4095));
        let late = format!("{}b", "a".repeat(4095));
        let rounds = 2_000;

        // calentamiento
        time_comparisons(&secret, &early, rounds / 10);

        let early_elapsed = time_comparisons(&secret, &early, rounds).as_secs_f64();
        let late_elapsed = time_comparisons(&secret, &late, rounds).as_secs_f64();

        let ratio = late_elapsed.max(early_elapsed) / late_elapsed.min(early_elapsed).max(f64::EPSILON);
        assert!(ratio < 10.0, "timing ratio too large: {ratio}");
    }
}
