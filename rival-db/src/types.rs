pub type Integer = i64;
pub type Text = String;
pub type Float = f64;
pub type DateTime = String;
pub type Boolean = bool;

/// A list of row ids, stored as a JSON array in SQL backends.
pub type IdList = Vec<Integer>;
