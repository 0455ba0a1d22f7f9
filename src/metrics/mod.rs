mod model;
pub use self::model::Label;
pub use self::model::Sample;
pub use self::model::Value;

mod parser;
pub use self::parser::parse_sample;
pub use self::parser::ParseError;
