use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// -- Messages --

/// Body of `POST /v1/messages`.
///
/// Property names match case-insensitively (`sender`, `SENDER` and `sEnder`
/// are the same field). Visibility also accepts `is_public` in any case.
/// Fields are optional at this level so the handler can report exactly which
/// one is missing instead of a generic deserialization error.
#[derive(Debug, PartialEq, Eq)]
pub struct CreateMessageRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub body: Option<String>,
    /// Defaults to true when absent.
    pub is_public: bool,
}

impl<'de> Deserialize<'de> for CreateMessageRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;

        let mut sender = None;
        let mut recipient = None;
        let mut body = None;
        let mut is_public = None;

        for (key, value) in fields {
            let (field, slot): (&'static str, &mut Option<Value>) =
                match key.to_ascii_lowercase().as_str() {
                    "sender" => ("sender", &mut sender),
                    "recipient" => ("recipient", &mut recipient),
                    "body" => ("body", &mut body),
                    "ispublic" | "is_public" => ("isPublic", &mut is_public),
                    // Unknown properties are ignored
                    _ => continue,
                };
            if slot.replace(value).is_some() {
                return Err(de::Error::duplicate_field(field));
            }
        }

        Ok(Self {
            sender: text_field(sender, "sender")?,
            recipient: text_field(recipient, "recipient")?,
            body: text_field(body, "body")?,
            is_public: match is_public {
                None => true,
                Some(Value::Bool(flag)) => flag,
                Some(other) => {
                    return Err(de::Error::custom(format!(
                        "isPublic must be a boolean, got {other}"
                    )));
                }
            },
        })
    }
}

fn text_field<E: de::Error>(value: Option<Value>, field: &str) -> Result<Option<String>, E> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(E::custom(format!("{field} must be a string, got {other}"))),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMessageResponse {
    pub id: String,
}
