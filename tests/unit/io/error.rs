//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use greedywall::WallError;
    use greedywall::io::error::{invalid_parameter, io_error, out_of_bounds};
    use std::error::Error;

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = WallError::FileSystem {
            path: "/tmp/map.txt".into(),
            operation: "read map",
            source: io_error,
        };

        assert!(error.source().is_some());
        assert!(error.to_string().contains("read map"));
        assert!(error.to_string().contains("/tmp/map.txt"));
    }

    // Tests OutOfBounds formatting
    // Verified by swapping width and height in the message
    #[test]
    fn test_out_of_bounds_message() {
        let message = out_of_bounds(12, 3, 10, 8).to_string();

        assert!(message.contains("(12, 3)"));
        assert!(message.contains("10x8"));
        assert!(out_of_bounds(0, 0, 0, 0).source().is_none());
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let message = invalid_parameter("max_wall_tiles", &0, &"must be greater than zero")
            .to_string();

        assert!(message.contains("max_wall_tiles"));
        assert!(message.contains("'0'"));
        assert!(message.contains("must be greater than zero"));
    }

    // Tests state misuse and map parse messages
    // Verified by dropping the state from the message
    #[test]
    fn test_state_and_parse_messages() {
        let state = WallError::InvalidState {
            operation: "step",
            state: "finished",
        };
        assert_eq!(
            state.to_string(),
            "Cannot step while the synthesizer is finished"
        );

        let parse = WallError::MapParse {
            line: 7,
            reason: "unknown cell symbol 'x'".to_string(),
        };
        assert!(parse.to_string().contains("line 7"));
    }

    // Tests conversion from io errors and the path helper
    // Verified by mapping io errors to InvalidSourceData
    #[test]
    fn test_conversions() {
        let converted: WallError = std::io::Error::other("disk full").into();
        assert!(matches!(converted, WallError::FileSystem { .. }));

        match io_error("Target must be a map file or directory") {
            WallError::InvalidParameter {
                parameter, reason, ..
            } => {
                assert_eq!(parameter, "path");
                assert!(reason.contains("map file"));
            }
            other => unreachable!("Expected InvalidParameter error type, got {other}"),
        }
    }
}
