//! Hulpfuncties voor het converteren van `Value`-types.

use crate::graph::value::{Value, ValueError};

use super::ComponentError;

/// Leest een getal; een lijst met precies één element wordt uitgepakt.
pub fn coerce_number(value: &Value) -> Result<f64, ComponentError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::List(l) if l.len() == 1 => coerce_number(&l[0]),
        other => Err(ValueError::type_mismatch("Number", other.kind()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::coerce_number;
    use crate::components::ComponentError;
    use crate::graph::value::{Value, ValueKind};

    #[test]
    fn number_unwraps_single_item_lists() {
        assert_eq!(coerce_number(&Value::Number(3.5)).unwrap(), 3.5);
        assert_eq!(
            coerce_number(&Value::List(vec![Value::Number(-1.0)])).unwrap(),
            -1.0
        );
    }

    #[test]
    fn number_rejects_points_and_long_lists() {
        let err = coerce_number(&Value::Point([1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(err, ComponentError::Type(ref e) if e.found() == ValueKind::Point));

        let list = Value::List(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert!(coerce_number(&list).is_err());
    }
}
