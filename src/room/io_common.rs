use crate::room::*;

// Above this, a float cannot hold every integer exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Reads an identifier stored either as a string or as an integer.
pub fn read_js_id(x: &JSValue) -> RoomResult<String> {
    match x {
        JSValue::String(s) => Ok(s.clone()),
        JSValue::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => ParsingJsonIdSnafu {
            content: x.to_string(),
        }
        .fail(),
    }
}

/// Reads a ranking position. Integral numbers and strings holding an integer are
/// accepted; anything else is kept as unparsed.
pub fn read_js_position(x: &JSValue) -> Position {
    match x {
        JSValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Position::Rank(i)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT => {
                        Position::Rank(f as i64)
                    }
                    _ => Position::Unparsed(n.to_string()),
                }
            }
        }
        JSValue::String(s) => Position::parse(s),
        _ => Position::Unparsed(x.to_string()),
    }
}
