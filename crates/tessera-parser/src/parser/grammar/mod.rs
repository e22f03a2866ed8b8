pub(crate) mod array;
pub(crate) mod object;
pub(crate) mod value;

pub(crate) use value::value;
