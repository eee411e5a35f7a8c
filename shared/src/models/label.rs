//! Label copy limits

/// Most copies one request may print
pub const MAX_LABEL_COPIES: u32 = 500;

/// Clamp a requested copy count to [1, MAX_LABEL_COPIES]
pub fn clamp_copies(copies: u32) -> u32 {
    copies.clamp(1, MAX_LABEL_COPIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_copies() {
        assert_eq!(clamp_copies(0), 1);
        assert_eq!(clamp_copies(1), 1);
        assert_eq!(clamp_copies(250), 250);
        assert_eq!(clamp_copies(501), 500);
    }
}
