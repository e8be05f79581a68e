use std::any::type_name;

use documented::{Documented, DocumentedFields};
use toml_edit::{Decor, Item, RawString, Table};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Appends documentation lines as TOML comments to the given `Decor`.
///
/// Each line of `docs` becomes a `#` comment appended after any comment
/// already present in the prefix.
pub fn append_docs_as_toml_comments(decor: &mut Decor, docs: &str) {
    let old_prefix = decor.prefix().and_then(RawString::as_str);
    let last_line = old_prefix.and_then(|prefix| prefix.lines().last());

    let comments: String = docs
        .lines()
        .map(|l| {
            if l.is_empty() {
                "#\n".into()
            } else {
                format!("# {l}\n")
            }
        })
        .collect();

    let new_prefix = match (old_prefix, last_line) {
        (Some(prefix), Some("")) => format!("{prefix}{comments}"),
        (Some(prefix), Some(_)) => format!("{prefix}#\n{comments}"),
        _ => comments,
    };
    decor.set_prefix(new_prefix);
}

/// Annotates a TOML `Table` with the field docs of `T`.
///
/// Struct-level docs are prepended too unless `is_root` is set. Keys with no
/// matching field are left alone and logged.
pub fn annotate_toml_table<T>(table: &mut Table, is_root: bool) -> Result<()>
where
    T: Documented + DocumentedFields,
{
    if !is_root {
        append_docs_as_toml_comments(table.decor_mut(), T::DOCS);
    }

    for (mut key_mut, value_item) in table.iter_mut() {
        let key_str = key_mut.get();
        match T::get_field_docs(key_str) {
            Ok(docs) => match value_item {
                Item::None | Item::ArrayOfTables(_) => {
                    return Err(ConfigError::UnexpectedTomlItem(key_str.into()));
                }
                Item::Value(_) => append_docs_as_toml_comments(key_mut.leaf_decor_mut(), docs),
                Item::Table(sub_table) => append_docs_as_toml_comments(sub_table.decor_mut(), docs),
            },
            Err(_) => {
                warn!(
                    "Field '{}' found in TOML but not documented on '{}'",
                    key_str,
                    type_name::<T>()
                );
            }
        }
    }

    Ok(())
}
