// ABOUTME: Aspect ratio math for the campaign editor
// ABOUTME: Reduces pixel dimensions to a normalized "W:H" ratio string

/// Greatest common divisor, Euclidean algorithm. `gcd(a, 0) == a`.
pub fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Reduce pixel dimensions to a ratio string, e.g. 1920x1080 -> "16:9".
///
/// Both sides must be positive; the image probe rejects zero dimensions
/// before they reach this function.
pub fn reduce_ratio(width: u32, height: u32) -> String {
    let divisor = gcd(width, height);
    format!("{}:{}", width / divisor, height / divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_common_ratios() {
        assert_eq!(reduce_ratio(1920, 1080), "16:9");
        assert_eq!(reduce_ratio(300, 100), "3:1");
        assert_eq!(reduce_ratio(7, 7), "1:1");
        assert_eq!(reduce_ratio(1200, 400), "3:1");
        assert_eq!(reduce_ratio(1500, 300), "5:1");
    }

    #[test]
    fn test_reduce_coprime_dimensions() {
        assert_eq!(reduce_ratio(1021, 17), "1021:17");
    }

    #[test]
    fn test_gcd_with_zero() {
        assert_eq!(gcd(12, 0), 12);
        assert_eq!(gcd(0, 12), 12);
    }
}
