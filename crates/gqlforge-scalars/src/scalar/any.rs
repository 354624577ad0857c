use super::impl_rename;
use super::json_float;
use super::json_int;
use super::json_string;
use super::scalar_info;
use super::ScalarCoercion;
use super::ScalarInfo;
use crate::ast::FloatValue;
use crate::ast::IntValue;
use crate::ast::Value;
use crate::error::ScalarError;
use crate::name;
use crate::value::AnyList;
use crate::value::AnyObject;
use crate::value::AnyValue;
use crate::value::RuntimeType;
use crate::value::ScalarValue;
use crate::value::SerializationType;
use crate::JsonMap;
use crate::JsonValue;
use crate::Name;
use indexmap::IndexMap;

/// A scalar of arbitrary shape: nested objects and lists of primitive values.
///
/// Converting a runtime value that contains itself fails with
/// [`ScalarError::CycleDetected`] instead of recursing forever.
/// The same list or object may appear more than once in a value
/// as long as it is not its own ancestor.
#[derive(Clone, Debug)]
pub struct AnyType {
    info: ScalarInfo,
}

impl Default for AnyType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(
                name!(Any),
                "The `Any` scalar type represents any valid GraphQL value.",
            ),
        }
    }
}

impl_rename!(AnyType);

/// Addresses of the lists and objects currently being converted
#[derive(Default)]
struct Ancestors(Vec<usize>);

impl Ancestors {
    fn enter(&mut self, scalar: &Name, addr: usize) -> Result<(), ScalarError> {
        if self.0.contains(&addr) {
            return Err(ScalarError::CycleDetected {
                scalar: scalar.clone(),
            });
        }
        self.0.push(addr);
        Ok(())
    }

    fn leave(&mut self) {
        self.0.pop();
    }
}

impl AnyType {
    fn literal_to_any(&self, literal: &Value) -> Result<AnyValue, ScalarError> {
        Ok(match literal {
            Value::Null => AnyValue::Null,
            Value::Boolean(value) => AnyValue::Boolean(*value),
            Value::Int(value) => match value.try_to_i64() {
                Ok(int) => AnyValue::Int(int),
                Err(_) => value
                    .try_to_f64()
                    .map(AnyValue::Float)
                    .map_err(|_| ScalarError::invalid_literal(self.name(), literal))?,
            },
            Value::Float(value) => value
                .try_to_f64()
                .map(AnyValue::Float)
                .map_err(|_| ScalarError::invalid_literal(self.name(), literal))?,
            Value::String(value) => AnyValue::String(value.clone()),
            Value::Enum(value) => AnyValue::String(value.as_str().to_owned()),
            Value::List(items) => AnyValue::List(AnyList::new(
                items
                    .iter()
                    .map(|item| self.literal_to_any(item))
                    .collect::<Result<_, _>>()?,
            )),
            Value::Object(fields) => AnyValue::Object(AnyObject::new(
                fields
                    .iter()
                    .map(|(name, value)| Ok((name.as_str().to_owned(), self.literal_to_any(value)?)))
                    .collect::<Result<_, ScalarError>>()?,
            )),
            Value::File(_) => return Err(ScalarError::invalid_literal(self.name(), literal)),
        })
    }

    fn any_to_literal(
        &self,
        value: &AnyValue,
        ancestors: &mut Ancestors,
    ) -> Result<Value, ScalarError> {
        Ok(match value {
            AnyValue::Null => Value::Null,
            AnyValue::Boolean(value) => Value::Boolean(*value),
            AnyValue::Int(value) => Value::Int(IntValue::from(*value)),
            AnyValue::Float(value) if value.is_finite() => Value::Float(FloatValue::from(*value)),
            AnyValue::Float(_) => {
                return Err(ScalarError::InvalidValue {
                    scalar: self.name().clone(),
                    value_type: "Float".to_owned(),
                })
            }
            AnyValue::String(value) => Value::String(value.clone()),
            AnyValue::List(list) => {
                ancestors.enter(self.name(), list.addr())?;
                let items = list
                    .items()
                    .iter()
                    .map(|item| self.any_to_literal(item, ancestors))
                    .collect::<Result<_, _>>();
                ancestors.leave();
                Value::List(items?)
            }
            AnyValue::Object(object) => {
                ancestors.enter(self.name(), object.addr())?;
                let mut fields = Vec::with_capacity(object.len());
                let mut result = Ok(());
                for (key, value) in object.entries() {
                    match Name::new(&key) {
                        Ok(name) => match self.any_to_literal(&value, ancestors) {
                            Ok(value) => fields.push((name, value)),
                            Err(err) => {
                                result = Err(err);
                                break;
                            }
                        },
                        // Object literals can only have GraphQL names as keys
                        Err(_) => {
                            result = Err(ScalarError::InvalidValue {
                                scalar: self.name().clone(),
                                value_type: "Object".to_owned(),
                            });
                            break;
                        }
                    }
                }
                ancestors.leave();
                result?;
                Value::Object(fields)
            }
        })
    }

    fn any_to_json(
        &self,
        value: &AnyValue,
        ancestors: &mut Ancestors,
    ) -> Result<JsonValue, ScalarError> {
        Ok(match value {
            AnyValue::Null => JsonValue::Null,
            AnyValue::Boolean(value) => JsonValue::Bool(*value),
            AnyValue::Int(value) => json_int(*value),
            AnyValue::Float(value) => json_float(*value).ok_or_else(|| ScalarError::InvalidValue {
                scalar: self.name().clone(),
                value_type: "Float".to_owned(),
            })?,
            AnyValue::String(value) => json_string(value.as_str()),
            AnyValue::List(list) => {
                ancestors.enter(self.name(), list.addr())?;
                let items = list
                    .items()
                    .iter()
                    .map(|item| self.any_to_json(item, ancestors))
                    .collect::<Result<Vec<_>, _>>();
                ancestors.leave();
                JsonValue::Array(items?)
            }
            AnyValue::Object(object) => {
                ancestors.enter(self.name(), object.addr())?;
                let mut map = JsonMap::new();
                let mut result = Ok(());
                for (key, value) in object.entries() {
                    match self.any_to_json(&value, ancestors) {
                        Ok(json) => {
                            map.insert(key.as_str(), json);
                        }
                        Err(err) => {
                            result = Err(err);
                            break;
                        }
                    }
                }
                ancestors.leave();
                result?;
                JsonValue::Object(map)
            }
        })
    }
}

fn json_to_any(json: &JsonValue) -> AnyValue {
    match json {
        JsonValue::Null => AnyValue::Null,
        JsonValue::Bool(value) => AnyValue::Boolean(*value),
        JsonValue::Number(number) => match number.as_i64() {
            Some(int) => AnyValue::Int(int),
            // u64 beyond i64 or a fractional number
            None => AnyValue::Float(number.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(value) => AnyValue::String(value.as_str().to_owned()),
        JsonValue::Array(items) => AnyValue::List(AnyList::new(items.iter().map(json_to_any).collect())),
        JsonValue::Object(entries) => AnyValue::Object(AnyObject::new(
            entries
                .iter()
                .map(|(key, value)| (key.as_str().to_owned(), json_to_any(value)))
                .collect::<IndexMap<_, _>>(),
        )),
    }
}

impl ScalarCoercion for AnyType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::Any
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::Any
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        self.literal_to_any(literal).is_ok()
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        matches!(value, ScalarValue::Null | ScalarValue::Any(_))
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match self.literal_to_any(literal)? {
            AnyValue::Null => Ok(ScalarValue::Null),
            value => Ok(ScalarValue::Any(value)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        match value {
            ScalarValue::Null => Ok(Value::Null),
            ScalarValue::Any(any) => self.any_to_literal(any, &mut Ancestors::default()),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        match value {
            ScalarValue::Null => Ok(JsonValue::Null),
            ScalarValue::Any(any) => self.any_to_json(any, &mut Ancestors::default()),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json_to_any(json) {
            AnyValue::Null => Some(ScalarValue::Null),
            value => Some(ScalarValue::Any(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_reference_is_a_cycle() {
        let object = AnyObject::default();
        object.insert("name", AnyValue::from("loop"));
        object.insert("me", AnyValue::Object(object.clone()));
        let value = ScalarValue::Any(AnyValue::Object(object));
        let any = AnyType::default();
        assert_eq!(
            any.serialize(&value),
            Err(ScalarError::CycleDetected { scalar: name!(Any) })
        );
        assert!(matches!(
            any.parse_value(&value),
            Err(ScalarError::CycleDetected { .. })
        ));
    }

    #[test]
    fn shared_children_are_not_cycles() {
        let shared = AnyList::new(vec![AnyValue::Int(1)]);
        let root = AnyList::new(vec![
            AnyValue::List(shared.clone()),
            AnyValue::List(shared),
        ]);
        let json = AnyType::default()
            .serialize(&ScalarValue::Any(AnyValue::List(root)))
            .unwrap();
        assert_eq!(json.to_string(), "[[1],[1]]");
    }

    #[test]
    fn enum_literals_become_strings() {
        let value = AnyType::default()
            .parse_literal(&Value::parse("{ kind: RED, n: [1.5] }").unwrap())
            .unwrap();
        let ScalarValue::Any(AnyValue::Object(object)) = value else {
            panic!("expected an object")
        };
        assert_eq!(object.get("kind"), Some(AnyValue::from("RED")));
    }
}
