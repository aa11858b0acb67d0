use std::collections::BTreeMap;
use std::sync::Arc;

use gridattr_model::{AttributeKind, AttributeValue, Font};

use crate::StoreError;

/// Grid-wide default attribute values.
///
/// The table is shared between clones and copied only when one of them
/// writes, so handing the defaults of a large grid to a helper is cheap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultAttributes {
    values: Arc<BTreeMap<AttributeKind, AttributeValue>>,
}

impl DefaultAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `self` and `other` still share one table.
    pub fn shares_storage_with(&self, other: &DefaultAttributes) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKind, &AttributeValue)> + '_ {
        self.values.iter().map(|(kind, value)| (*kind, value))
    }

    /// The default font, if one has been set.
    pub fn font(&self) -> Option<&Font> {
        self.values
            .get(&AttributeKind::Font)
            .and_then(AttributeValue::as_font)
    }

    /// Default value of `kind`; virtual kinds read the default font.
    pub fn get(&self, kind: AttributeKind) -> Option<AttributeValue> {
        match kind.font_property() {
            Some(property) => self.font().map(|font| font.property(property)),
            None => self.values.get(&kind).cloned(),
        }
    }

    /// Sets the default value of `kind`.
    ///
    /// A virtual kind rewrites the matching field of the default font,
    /// starting from [`Font::default`] if no default font exists yet.
    pub fn set(&mut self, kind: AttributeKind, value: AttributeValue) -> Result<(), StoreError> {
        if let Some(property) = kind.font_property() {
            let mut font = self.font().cloned().unwrap_or_default();
            font.apply(property, &value)
                .map_err(|err| StoreError::TypeMismatch {
                    kind,
                    expected: err.expected,
                    found: err.found,
                })?;
            Arc::make_mut(&mut self.values).insert(AttributeKind::Font, AttributeValue::Font(font));
            return Ok(());
        }

        let expected = kind.value_type();
        if value.value_type() != expected {
            return Err(StoreError::TypeMismatch {
                kind,
                expected,
                found: value.value_type(),
            });
        }
        Arc::make_mut(&mut self.values).insert(kind, value);
        Ok(())
    }

    /// Removes the default for `kind`; virtual kinds cannot be cleared on
    /// their own and leave the default font in place.
    pub fn clear(&mut self, kind: AttributeKind) -> bool {
        if kind.is_virtual() || !self.values.contains_key(&kind) {
            return false;
        }
        Arc::make_mut(&mut self.values).remove(&kind).is_some()
    }
}
