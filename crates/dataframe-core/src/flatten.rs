use crate::error::Result;
use crate::frame::DataFrame;
use crate::value::Value;

/// Collapse nested frames into one level.
///
/// Each leaf is stored under its dot-joined path (`a.b.c`). Unnamed fields
/// use their index within the parent as the path segment. Later leaves with
/// the same path overwrite earlier ones in place.
///
/// Fails if a path grows longer than a field name may be.
pub fn flatten(frame: &DataFrame) -> Result<DataFrame> {
    let mut target = DataFrame::new();
    recurse(frame, None, &mut target)?;
    target.set_modified(false);
    Ok(target)
}

fn recurse(source: &DataFrame, prefix: Option<&str>, target: &mut DataFrame) -> Result<()> {
    for (index, field) in source.iter().enumerate() {
        let segment = match field.name() {
            Some(name) => name.to_string(),
            None => index.to_string(),
        };
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{segment}"),
            None => segment,
        };

        if field.is_frame() {
            if let Value::Frame(child) = field.object_value()? {
                recurse(&child, Some(&path), target)?;
            }
        } else {
            let mut leaf = field.clone();
            leaf.set_name(Some(&path))?;
            target.put_field(leaf);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::types::FieldType;

    #[test]
    fn nested_names_are_dot_joined() {
        let mut inner = DataFrame::new();
        inner.add(Some("c"), 3i32).unwrap();
        let mut middle = DataFrame::new();
        middle.add(Some("b"), inner).unwrap();
        middle.add(Some("x"), "leaf").unwrap();
        let mut outer = DataFrame::new();
        outer.add(Some("a"), middle).unwrap();
        outer.add(Some("top"), true).unwrap();

        let flat = flatten(&outer).unwrap();
        assert_eq!(flat.names(), vec!["a.b.c", "a.x", "top"]);
        assert_eq!(flat.object("a.b.c").unwrap(), Some(Value::S32(3)));
        assert!(!flat.is_modified());
    }

    #[test]
    fn unnamed_fields_use_index() {
        let mut list = DataFrame::new();
        list.add(None, 10u8).unwrap();
        list.add(None, 20u8).unwrap();
        let mut outer = DataFrame::new();
        outer.add(Some("list"), list).unwrap();

        let flat = flatten(&outer).unwrap();
        assert_eq!(flat.names(), vec!["list.0", "list.1"]);
        assert_eq!(flat.field("list.1").unwrap().field_type(), FieldType::U8);
    }

    #[test]
    fn duplicate_paths_overwrite() {
        let mut outer = DataFrame::new();
        outer.add(Some("k"), 1u8).unwrap();
        outer.add(Some("k"), 2u8).unwrap();
        let flat = flatten(&outer).unwrap();
        assert_eq!(flat.field_count(), 1);
        assert_eq!(flat.object("k").unwrap(), Some(Value::U8(2)));
    }

    #[test]
    fn overlong_path_is_rejected() {
        let name = "n".repeat(200);
        let mut inner = DataFrame::new();
        inner.add(Some(&name), 1u8).unwrap();
        let mut outer = DataFrame::new();
        outer.add(Some(&name), inner).unwrap();
        assert!(matches!(flatten(&outer), Err(CodecError::Argument(_))));
    }
}
