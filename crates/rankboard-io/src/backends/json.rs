use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rankboard_common::{Dataset, Value};
use serde_json::Value as Json;

use crate::error::IoError;
use crate::loader::unique_headers;
use crate::traits::DataSource;

#[derive(Clone, Debug)]
enum JsonInput {
    Path(PathBuf),
    Text { name: String, data: Arc<str> },
}

/// A JSON array of flat objects, one object per record. Keys become
/// columns in first-appearance order.
#[derive(Clone, Debug)]
pub struct JsonSource {
    input: JsonInput,
}

impl JsonSource {
    pub fn open_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            input: JsonInput::Path(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_text(name: impl Into<String>, data: impl Into<Arc<str>>) -> Self {
        Self {
            input: JsonInput::Text {
                name: name.into(),
                data: data.into(),
            },
        }
    }
}

impl DataSource for JsonSource {
    fn id(&self) -> String {
        match &self.input {
            JsonInput::Path(p) => format!("json:{}", p.display()),
            JsonInput::Text { name, .. } => format!("json:{name}"),
        }
    }

    fn load(&self) -> Result<Dataset, IoError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("source_load", source = self.id().as_str()).entered();

        match &self.input {
            JsonInput::Path(p) => read_json_records(BufReader::new(File::open(p)?)),
            JsonInput::Text { data, .. } => read_json_records(data.as_bytes()),
        }
    }
}

pub fn read_json_records<R: Read>(reader: R) -> Result<Dataset, IoError> {
    let doc: Json = serde_json::from_reader(reader).map_err(|e| IoError::from_backend("json", e))?;
    let Json::Array(items) = doc else {
        return Err(IoError::Backend {
            backend: "json".to_string(),
            message: "expected an array of records".to_string(),
        });
    };

    let mut records: Vec<Vec<(String, Value)>> = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let Json::Object(map) = item else {
            return Err(IoError::Backend {
                backend: "json".to_string(),
                message: format!("record {} is not an object", i + 1),
            });
        };
        let mut record = Vec::with_capacity(map.len());
        for (k, v) in map {
            record.push((k, json_to_value(v, i)?));
        }
        records.push(record);
    }

    let dataset = Dataset::from_records(records);
    // Object keys are unique per record, but a blank key still needs a name.
    let renamed = unique_headers(dataset.columns().to_vec());
    if renamed.as_slice() != dataset.columns() {
        return Dataset::new(renamed, dataset.rows().to_vec())
            .map_err(|e| IoError::Header(e.to_string()));
    }
    Ok(dataset)
}

fn json_to_value(v: Json, record: usize) -> Result<Value, IoError> {
    Ok(match v {
        Json::Null => Value::Empty,
        Json::Bool(b) => Value::Boolean(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Empty, Value::Number),
        },
        Json::String(s) => Value::Text(s),
        Json::Array(_) | Json::Object(_) => {
            return Err(IoError::Unsupported {
                feature: "nested json".to_string(),
                context: format!("record {} holds an array or object value", record + 1),
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_become_columns_in_order() {
        let ds = read_json_records(
            br#"[{"cat":"A","val":10},{"val":2.5,"cat":"B","extra":null}]"#.as_slice(),
        )
        .unwrap();
        assert_eq!(ds.columns(), ["cat", "val", "extra"]);
        assert_eq!(ds.get(1, "val"), Some(&Value::Number(2.5)));
        assert_eq!(ds.get(0, "extra"), Some(&Value::Empty));
    }

    #[test]
    fn nested_values_are_rejected() {
        let err = read_json_records(br#"[{"a":[1,2]}]"#.as_slice()).unwrap_err();
        assert!(matches!(err, IoError::Unsupported { .. }));
    }
}
