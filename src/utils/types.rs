pub type Address = String;

pub type Value = Vec<u8>;
