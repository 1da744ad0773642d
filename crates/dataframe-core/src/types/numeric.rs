use super::{expect_len, mismatch, FieldType, FieldTypeHandler};
use crate::byteutil;
use crate::error::Result;
use crate::value::Value;

macro_rules! numeric_handler {
    ($(#[$doc:meta])* $name:ident, $ty:ident, $width:expr, $render:ident, $retrieve:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl FieldTypeHandler for $name {
            fn field_type(&self) -> FieldType {
                FieldType::$ty
            }

            fn size(&self) -> Option<usize> {
                Some($width)
            }

            fn is_numeric(&self) -> bool {
                true
            }

            fn accepts(&self, value: &Value) -> bool {
                matches!(value, Value::$ty(_))
            }

            fn encode(&self, value: &Value) -> Result<Vec<u8>> {
                match value {
                    Value::$ty(v) => Ok(byteutil::$render(*v).to_vec()),
                    other => Err(mismatch(self, other)),
                }
            }

            fn decode(&self, bytes: &[u8]) -> Result<Value> {
                expect_len(self, bytes, $width)?;
                byteutil::$retrieve(bytes, 0).map(Value::$ty)
            }
        }
    };
}

numeric_handler!(
    /// Signed 8-bit integer.
    S8Type, S8, 1, render_i8, retrieve_i8
);
numeric_handler!(
    /// Unsigned 8-bit integer.
    U8Type, U8, 1, render_u8, retrieve_u8
);
numeric_handler!(S16Type, S16, 2, render_i16, retrieve_i16);
numeric_handler!(U16Type, U16, 2, render_u16, retrieve_u16);
numeric_handler!(S32Type, S32, 4, render_i32, retrieve_i32);
numeric_handler!(U32Type, U32, 4, render_u32, retrieve_u32);
numeric_handler!(S64Type, S64, 8, render_i64, retrieve_i64);
numeric_handler!(U64Type, U64, 8, render_u64, retrieve_u64);
numeric_handler!(
    /// IEEE-754 single precision, raw bits.
    FloatType, Float, 4, render_f32, retrieve_f32
);
numeric_handler!(
    /// IEEE-754 double precision, raw bits.
    DoubleType, Double, 8, render_f64, retrieve_f64
);
