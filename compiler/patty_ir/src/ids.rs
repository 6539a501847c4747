//! Node IDs and list ranges for the flat syntax tree.
//!
//! Every node kind lives in its own arena vector and is addressed by a
//! 4-byte index. Lists of children are `(start, len)` windows into a shared
//! side table, so node kinds stay `Copy`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::ast::{BindingElem, BindingProp, Declarator, ImportSpecifier, Param, Prop};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Sentinel for "no node".
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                } else {
                    write!(f, concat!(stringify!($name), "::INVALID"))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

define_id!(
    /// Index into the expression arena.
    ExprId
);
define_id!(
    /// Index into the statement arena.
    StmtId
);
define_id!(
    /// Index into the function table.
    FunctionId
);
define_id!(
    /// Index into the binding-pattern table.
    BindingId
);

/// A contiguous window into one of the arena's list tables.
///
/// The element type only selects which table the range points into.
pub struct ListRange<T> {
    pub start: u32,
    pub len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ListRange<T> {
    pub const EMPTY: Self = ListRange::new(0, 0);

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        ListRange {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn as_range(self) -> std::ops::Range<usize> {
        let start = self.start as usize;
        start..start + self.len as usize
    }
}

impl<T> Copy for ListRange<T> {}

impl<T> Clone for ListRange<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for ListRange<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.len == other.len
    }
}

impl<T> Eq for ListRange<T> {}

impl<T> Hash for ListRange<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.len.hash(state);
    }
}

impl<T> Default for ListRange<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> fmt::Debug for ListRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}; +{}]", self.start, self.len)
    }
}

pub type ExprRange = ListRange<ExprId>;
pub type StmtRange = ListRange<StmtId>;
pub type PropRange = ListRange<Prop>;
pub type ParamRange = ListRange<Param>;
pub type DeclRange = ListRange<Declarator>;
pub type SpecifierRange = ListRange<ImportSpecifier>;
pub type BindingElemRange = ListRange<BindingElem>;
pub type BindingPropRange = ListRange<BindingProp>;
