use std::fmt;
use std::sync::OnceLock;

use crate::error::{CodecError, Result};
use crate::types::{
    ArrayType, BooleanType, ByteArrayType, DateType, DoubleType, FieldType, FieldTypeHandler,
    FloatType, FrameType, S16Type, S32Type, S64Type, S8Type, StringType, U16Type, U32Type,
    U64Type, U8Type, UndefinedType, UriType,
};
use crate::value::Value;

/// Code-indexed table of field type handlers.
///
/// Handlers are stored at the index of their type code, so lookups by code
/// are a single slice access. The process-wide table from
/// [`TypeRegistry::global`] holds every built-in type and is read-only.
pub struct TypeRegistry {
    handlers: Vec<Box<dyn FieldTypeHandler>>,
}

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: Vec::with_capacity(FieldType::ALL.len()),
        }
    }

    /// Create a registry holding all built-in handlers.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let handlers: [Box<dyn FieldTypeHandler>; 18] = [
            Box::new(FrameType),
            Box::new(UndefinedType),
            Box::new(ByteArrayType),
            Box::new(StringType),
            Box::new(S8Type),
            Box::new(U8Type),
            Box::new(S16Type),
            Box::new(U16Type),
            Box::new(S32Type),
            Box::new(U32Type),
            Box::new(S64Type),
            Box::new(U64Type),
            Box::new(FloatType),
            Box::new(DoubleType),
            Box::new(BooleanType),
            Box::new(DateType),
            Box::new(UriType),
            Box::new(ArrayType),
        ];
        for handler in handlers {
            // Built-in handlers are listed in code order.
            let code = handler.field_type();
            if let Err(err) = registry.register(code, handler) {
                tracing::error!(%code, error = %err, "built-in handler registration failed");
            }
        }
        registry
    }

    /// The shared registry of built-in types, initialized on first use.
    pub fn global() -> &'static TypeRegistry {
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Register the handler for the next type code.
    ///
    /// Codes must be registered in ascending order with no gaps, and the
    /// handler must serve the code it is registered under.
    pub fn register(
        &mut self,
        code: FieldType,
        handler: Box<dyn FieldTypeHandler>,
    ) -> Result<()> {
        let expected = self.handlers.len();
        if usize::from(code.code()) != expected {
            return Err(CodecError::Argument(format!(
                "type code {} registered out of order, expected {expected}",
                code.code()
            )));
        }
        if handler.field_type() != code {
            return Err(CodecError::Argument(format!(
                "handler for {} registered under code {}",
                handler.type_name(),
                code.code()
            )));
        }
        self.handlers.push(handler);
        Ok(())
    }

    /// Infer the wire type of a value: the first handler, in code order,
    /// that accepts it.
    pub fn type_for(&self, value: &Value) -> Result<FieldType> {
        self.handlers
            .iter()
            .find(|handler| handler.accepts(value))
            .map(|handler| handler.field_type())
            .ok_or(CodecError::UnsupportedValue(value.kind()))
    }

    pub fn handler_for(&self, code: FieldType) -> Result<&dyn FieldTypeHandler> {
        self.handler_for_code(code.code())
    }

    /// Handler for a raw code octet, as read from the wire.
    pub fn handler_for_code(&self, code: u8) -> Result<&dyn FieldTypeHandler> {
        self.handlers
            .get(usize::from(code))
            .map(|handler| handler.as_ref())
            .ok_or(CodecError::UnsupportedType { code })
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Mnemonics of every registered type, in code order.
    pub fn type_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.type_name()).collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
