use serde::Serialize;
use std::fmt;

/// A syntax error resolved to a 1-based line and column in a named file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.file, self.line, self.col, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic {
            file: "src/foo.py".to_string(),
            line: 12,
            col: 5,
            message: "Statement expected, found ')'".to_string(),
        };
        assert_eq!(d.to_string(), "src/foo.py:12:5: Statement expected, found ')'");
    }

    #[test]
    fn test_diagnostic_json_fields() {
        let d = Diagnostic {
            file: "a.py".to_string(),
            line: 1,
            col: 2,
            message: "Colon expected".to_string(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["file"], "a.py");
        assert_eq!(json["line"], 1);
        assert_eq!(json["col"], 2);
        assert_eq!(json["message"], "Colon expected");
    }
}
