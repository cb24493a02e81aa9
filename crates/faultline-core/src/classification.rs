//! Exact failure classifications
//!
//! [`Classification`] is the identity under which help text is registered and
//! looked up. It names one taxonomy kind, one application-defined variant of a
//! kind, or one foreign error type. Two classifications are equal only when
//! they name the same thing; there is no ancestor matching.

use crate::kind::FailureKind;
use std::any::TypeId;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Identity of a foreign (non-taxonomy) error type
#[derive(Debug, Clone, Copy)]
pub struct ForeignType {
    id: TypeId,
    name: &'static str,
}

impl ForeignType {
    /// Identity of `E`
    #[inline]
    #[must_use]
    pub fn of<E: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
        }
    }

    /// Type id
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ForeignType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ForeignType {}

impl Hash for ForeignType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Exact dynamic classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Plain instance of a taxonomy kind
    Taxonomy(FailureKind),
    /// Application-defined leaf below a taxonomy kind, e.g. `ReturnCode::NotFound`
    Variant(FailureKind, &'static str),
    /// Error type outside the taxonomy
    Foreign(ForeignType),
}

impl Classification {
    /// Classification of the foreign error type `E`
    #[inline]
    #[must_use]
    pub fn foreign<E: std::error::Error + 'static>() -> Self {
        Self::Foreign(ForeignType::of::<E>())
    }

    /// Taxonomy kind, `None` for foreign types
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Taxonomy(kind) | Self::Variant(kind, _) => Some(*kind),
            Self::Foreign(_) => None,
        }
    }

    /// Namespace-qualified name
    #[must_use]
    pub fn qualified_name(&self) -> Cow<'static, str> {
        match self {
            Self::Taxonomy(kind) => Cow::Owned(kind.qualified_name()),
            Self::Variant(kind, variant) => {
                Cow::Owned(format!("{}::{variant}", kind.qualified_name()))
            }
            Self::Foreign(ty) => Cow::Borrowed(ty.name()),
        }
    }

    /// Name with the namespace prefix stripped
    #[must_use]
    pub fn short_name(&self) -> String {
        strip_namespace(&self.qualified_name())
    }
}

impl From<FailureKind> for Classification {
    fn from(kind: FailureKind) -> Self {
        Self::Taxonomy(kind)
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// Strip the path of a type name, keeping generic arguments intact
///
/// `std::io::error::Error` becomes `Error`,
/// `alloc::vec::Vec<u8>` becomes `Vec<u8>`.
#[must_use]
pub fn strip_namespace(name: &str) -> String {
    let (path, generics) = name.split_at(name.find('<').unwrap_or(name.len()));
    let base = path.rsplit("::").next().unwrap_or(path);
    format!("{base}{generics}")
}
