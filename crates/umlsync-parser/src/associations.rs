//! Association discovery from field types.
//!
//! A field line such as `- enemies: Dictionary<string, List<Enemy>>` declares
//! a dependency on every class named in its type: the base type before any
//! generic, call or array suffix, and recursively each top-level generic
//! argument.

use log::debug;

use umlsync_core::{
    markup::{LINE_BREAK, unescape_angle_brackets},
    model::{ClassModel, DescriptorId},
};

/// Records an association for every field type naming another class of the model.
///
/// Associations are added in discovery order: classes in model order, fields
/// in line order, then the base type before its generic arguments. Self
/// references and repeated targets are ignored.
pub fn resolve_associations(model: &mut ClassModel) {
    let mut discovered: Vec<(DescriptorId, DescriptorId)> = Vec::new();

    for (source, descriptor) in model.iter() {
        let Some(fields) = descriptor.fields() else {
            continue;
        };
        for line in fields.split(LINE_BREAK) {
            let line = unescape_angle_brackets(line);
            let Some((_, field_type)) = line.split_once(':') else {
                continue;
            };
            for name in type_names(field_type) {
                if let Some(target) = model.find_by_name(name) {
                    discovered.push((source, target));
                }
            }
        }
    }

    for (source, target) in discovered {
        if model.add_association(source, target) {
            debug!(
                source = model.get(source).name(),
                target = model.get(target).name();
                "Association discovered"
            );
        }
    }
}

/// Lists the candidate class names mentioned by a type expression, base first.
///
/// ```text
/// Dictionary<string, List<Enemy>>  ->  Dictionary, string, List, Enemy
/// Weapon[]                         ->  Weapon
/// Func<int>(float)                 ->  Func, int
/// ```
pub fn type_names(type_expr: &str) -> Vec<&str> {
    let mut names = Vec::new();
    collect_type_names(type_expr, &mut names);
    names
}

fn collect_type_names<'a>(type_expr: &'a str, names: &mut Vec<&'a str>) {
    let type_expr = type_expr.trim();
    let base_end = type_expr.find(['<', '(', '[']).unwrap_or(type_expr.len());
    let base = type_expr[..base_end].trim();
    if !base.is_empty() {
        names.push(base);
    }

    if let Some(arguments) = generic_arguments(type_expr) {
        for argument in split_top_level(arguments) {
            collect_type_names(argument, names);
        }
    }
}

/// Returns the text between the first `<` and its matching `>`.
///
/// An unbalanced expression yields everything after the first `<`.
fn generic_arguments(type_expr: &str) -> Option<&str> {
    let open = type_expr.find('<')?;
    let inner = &type_expr[open + 1..];
    let mut depth = 0usize;
    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' if depth == 0 => return Some(&inner[..idx]),
            '>' => depth -= 1,
            _ => {}
        }
    }
    Some(inner)
}

/// Splits generic arguments at commas that are not nested inside `<...>`.
fn split_top_level(arguments: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in arguments.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&arguments[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&arguments[start..]);
    parts.into_iter().map(str::trim).filter(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use umlsync_core::descriptor::ClassDescriptor;

    use super::*;

    fn model_with(classes: &[(&str, &[&str])]) -> ClassModel {
        let mut model = ClassModel::new();
        for (name, fields) in classes {
            let mut descriptor = ClassDescriptor::new(*name, None, "");
            for field in *fields {
                descriptor.append_field(field, None);
            }
            model.push(descriptor).unwrap();
        }
        model
    }

    fn associations_of<'a>(model: &'a ClassModel, name: &str) -> Vec<&'a str> {
        let id = model.find_by_name(name).unwrap();
        model
            .get(id)
            .associations()
            .iter()
            .map(|target| model.get(*target).name())
            .collect()
    }

    #[test]
    fn test_type_names_nested_generics() {
        assert_eq!(
            type_names("Dictionary<string, List<Enemy>>"),
            ["Dictionary", "string", "List", "Enemy"]
        );
    }

    #[test]
    fn test_type_names_arrays_and_calls() {
        assert_eq!(type_names(" Weapon[] "), ["Weapon"]);
        assert_eq!(type_names("Func<int>(float)"), ["Func", "int"]);
        assert_eq!(type_names("Pair<A, B>[]"), ["Pair", "A", "B"]);
    }

    #[test]
    fn test_type_names_unbalanced() {
        assert_eq!(type_names("List<Enemy"), ["List", "Enemy"]);
    }

    #[test]
    fn test_resolve_simple_field() {
        let mut model = model_with(&[("Player", &["- weapon: Weapon"]), ("Weapon", &[])]);
        resolve_associations(&mut model);

        assert_eq!(associations_of(&model, "Player"), ["Weapon"]);
        assert!(associations_of(&model, "Weapon").is_empty());
    }

    #[test]
    fn test_resolve_generic_arguments() {
        let mut model = model_with(&[
            ("Level", &["- spawns: Dictionary<Spawner, List<Enemy>>"]),
            ("Enemy", &[]),
            ("Spawner", &[]),
        ]);
        resolve_associations(&mut model);

        assert_eq!(associations_of(&model, "Level"), ["Spawner", "Enemy"]);
    }

    #[test]
    fn test_resolve_skips_self_and_duplicates() {
        let mut model = model_with(&[
            (
                "Node",
                &["- next: Node", "- items: Item[]", "- backup: List<Item>"],
            ),
            ("Item", &[]),
        ]);
        resolve_associations(&mut model);

        assert_eq!(associations_of(&model, "Node"), ["Item"]);
    }

    #[test]
    fn test_resolve_ignores_lines_without_type() {
        let mut model = model_with(&[("A", &["B"]), ("B", &[])]);
        resolve_associations(&mut model);

        assert!(associations_of(&model, "A").is_empty());
    }

    proptest! {
        #[test]
        fn type_names_never_contain_brackets(expr in "[A-Za-z<>,\\[\\]() ]{0,60}") {
            for name in type_names(&expr) {
                prop_assert!(!name.is_empty());
                prop_assert!(!name.contains(['<', '(', '[']));
            }
        }
    }
}
