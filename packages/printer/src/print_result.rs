use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use reprint_common::{ReprintError, ReprintResult};
use reprint_sourcemap::{from_json_object, SourceMap};
use serde_json::{Map, Value};
use tracing::warn;

const STRINGIFY_DEPRECATION: &str = "Deprecation warning: printing now returns a PrintResult with a `code` field. \
    Formatting the result itself as a string still works but is strongly discouraged.";

/// One-shot advisory notice
///
/// The first call to [`DeprecationNotice::notify`] hands the message to
/// the sink; every later call is ignored. The flag is atomic, so a notice
/// can be shared between threads.
pub struct DeprecationNotice {
    fired: AtomicBool,
    sink: Box<dyn Fn(&str) + Send + Sync>,
}

impl DeprecationNotice {
    pub fn new(sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            fired: AtomicBool::new(false),
            sink: Box::new(sink),
        }
    }

    /// Process-wide notice used by results that were not given their own
    pub fn global() -> Arc<DeprecationNotice> {
        static GLOBAL: OnceLock<Arc<DeprecationNotice>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(DeprecationNotice::default())))
    }

    /// Emit `message` unless this notice already fired; returns whether it
    /// was emitted
    pub fn notify(&self, message: &str) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        (self.sink)(message);
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

impl Default for DeprecationNotice {
    fn default() -> Self {
        Self::new(|message| warn!("{}", message))
    }
}

impl fmt::Debug for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeprecationNotice")
            .field("fired", &self.has_fired())
            .finish_non_exhaustive()
    }
}

/// Printed code and, when requested, its source map
#[derive(Debug)]
pub struct PrintResult {
    pub code: String,
    /// Source map as a plain JSON object
    pub map: Option<Map<String, Value>>,
    notice: Arc<DeprecationNotice>,
}

impl PrintResult {
    pub fn new(code: impl Into<String>, map: Option<Map<String, Value>>) -> Self {
        Self {
            code: code.into(),
            map,
            notice: DeprecationNotice::global(),
        }
    }

    /// Build a result from untyped values
    ///
    /// `code` must be a string and `map`, when present, an object.
    pub fn from_values(code: Value, map: Option<Value>) -> ReprintResult<Self> {
        let code = match code {
            Value::String(code) => code,
            other => return Err(ReprintError::type_constraint("string", json_type(&other))),
        };
        let map = match map {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => return Err(ReprintError::type_constraint("object", json_type(&other))),
        };
        Ok(Self::new(code, map))
    }

    /// Use `notice` instead of the process-wide one for the string shim
    pub fn with_notice(mut self, notice: Arc<DeprecationNotice>) -> Self {
        self.notice = notice;
        self
    }

    /// Shared result for printing nothing
    pub fn empty() -> Arc<PrintResult> {
        static EMPTY: OnceLock<Arc<PrintResult>> = OnceLock::new();
        Arc::clone(EMPTY.get_or_init(|| Arc::new(PrintResult::new(String::new(), None))))
    }

    /// Decoded source map
    pub fn source_map(&self) -> ReprintResult<Option<SourceMap>> {
        match &self.map {
            Some(map) => Ok(Some(from_json_object(map)?)),
            None => Ok(None),
        }
    }
}

/// Legacy string form: the code, after a one-time deprecation notice
impl fmt::Display for PrintResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.notice.notify(STRINGIFY_DEPRECATION);
        f.write_str(&self.code)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn recording_notice() -> (Arc<DeprecationNotice>, Arc<Mutex<Vec<String>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        let notice = DeprecationNotice::new(move |message| sink.lock().unwrap().push(message.to_string()));
        (Arc::new(notice), messages)
    }

    #[test]
    fn test_from_values_checks_types() {
        let err = PrintResult::from_values(json!(42), None).unwrap_err();
        assert!(matches!(
            err,
            ReprintError::TypeConstraintViolation {
                expected: "string",
                ..
            }
        ));

        let err = PrintResult::from_values(json!("x"), Some(json!("map"))).unwrap_err();
        assert!(matches!(
            err,
            ReprintError::TypeConstraintViolation {
                expected: "object",
                ..
            }
        ));

        let result = PrintResult::from_values(json!("x;"), Some(json!({ "version": 3 }))).unwrap();
        assert_eq!(result.code, "x;");
        assert_eq!(result.map.as_ref().and_then(|m| m.get("version")), Some(&json!(3)));
    }

    #[test]
    fn test_notice_fires_once_across_results() {
        let (notice, messages) = recording_notice();
        let first = PrintResult::new("a;", None).with_notice(Arc::clone(&notice));
        let second = PrintResult::new("b;", None).with_notice(Arc::clone(&notice));

        assert_eq!(first.to_string(), "a;");
        assert_eq!(second.to_string(), "b;");

        let messages = messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("code"));
        assert!(notice.has_fired());
    }

    #[test]
    fn test_reading_code_does_not_notify() {
        let (notice, messages) = recording_notice();
        let result = PrintResult::new("a;", None).with_notice(notice);
        assert_eq!(result.code, "a;");
        assert!(messages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_is_shared() {
        let a = PrintResult::empty();
        let b = PrintResult::empty();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.code, "");
        assert!(a.map.is_none());
    }
}
