//! Structurally-uniqued types and the central type registry.
//!
//! All types are interned into a [`TypeDb`], which assigns each unique
//! structural descriptor a [`TypeId`]. Equal descriptors always resolve to
//! the same ID, so ID comparison is type equality — the invariant every
//! operand-type check and canonicalization rule relies on.

use crate::ids::TypeId;
use kairo_common::Ident;
use kairo_source::Span;
use serde::{Deserialize, Serialize};

/// The signedness tag of an integer type.
///
/// The dialect reasons about signless bit-vectors: sign is a property of the
/// operation consuming a value, not of the type. Signed and unsigned tags
/// exist so foreign integer types can be represented, but only signless
/// integers are usable as hardware values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Signedness {
    /// No sign convention; interpretation is up to each operation.
    Signless,
    /// Two's-complement signed.
    Signed,
    /// Unsigned.
    Unsigned,
}

/// A named field of an aggregate type.
///
/// Field order is significant (it defines physical layout), so aggregate
/// identity compares fields pairwise in insertion order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FieldInfo {
    /// The field name.
    pub name: Ident,
    /// The field type.
    pub ty: TypeId,
}

/// A structural type descriptor.
///
/// Composite variants reference their element and field types by [`TypeId`]
/// handle into the same registry. A handle must already exist before it can
/// be referenced, so type graphs are acyclic by construction order.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Type {
    /// An integer type of known width.
    Int {
        /// The number of bits.
        width: u32,
        /// The signedness tag.
        signedness: Signedness,
    },
    /// A fixed-size array of a value type.
    Array {
        /// The type of each element.
        element: TypeId,
        /// The number of elements.
        size: u32,
    },
    /// A marker wrapping a value that resides in mutable, addressable
    /// storage rather than being a pure value. Never itself a valid element
    /// type.
    InOut {
        /// The wrapped value type.
        element: TypeId,
    },
    /// An aggregate of named fields in declaration order.
    Struct {
        /// The fields, in insertion order.
        fields: Vec<FieldInfo>,
    },
}

/// The error raised when a composite type is requested with an invalid
/// element.
///
/// No type instance is constructed when this error is returned; the caller
/// reports it as a diagnostic at the requesting location and recovers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The candidate element type does not satisfy the value-type predicate.
    #[error("invalid element type for composite type")]
    InvalidElementType {
        /// The offending element type.
        element: TypeId,
        /// The location of the request.
        span: Span,
    },
}

/// Central type registry — interned structural types.
///
/// Each unique [`Type`] descriptor is stored once and referenced by
/// [`TypeId`]. The registry is an explicit context object with no hidden
/// global state; it is created once per compilation unit and torn down with
/// it. Lookup-or-insert takes `&mut self`, so concurrent callers share the
/// registry behind a lock and two requests for an equal descriptor can never
/// produce two distinct canonical instances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDb {
    types: Vec<Type>,
}

impl TypeDb {
    /// Creates a new, empty type registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a descriptor, returning its [`TypeId`].
    ///
    /// If a structurally equal descriptor already exists, returns the
    /// existing ID. Otherwise, allocates a new entry. This is the raw
    /// uniquing primitive; composite types should go through the validating
    /// constructors [`array_of`](Self::array_of) and
    /// [`inout_of`](Self::inout_of).
    pub fn intern(&mut self, ty: Type) -> TypeId {
        for (i, existing) in self.types.iter().enumerate() {
            if existing == &ty {
                return TypeId::from_raw(i as u32);
            }
        }
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Returns a reference to the descriptor with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.as_raw() as usize]
    }

    /// Interns the signless integer type of the given width.
    pub fn int(&mut self, width: u32) -> TypeId {
        self.int_with_signedness(width, Signedness::Signless)
    }

    /// Interns an integer type with an explicit signedness tag.
    pub fn int_with_signedness(&mut self, width: u32, signedness: Signedness) -> TypeId {
        self.intern(Type::Int { width, signedness })
    }

    /// Constructs the array type `array<size x element>`, validating the
    /// element.
    ///
    /// The element must satisfy [`is_value_type`](Self::is_value_type);
    /// otherwise [`TypeError::InvalidElementType`] is returned carrying the
    /// offending type and the requesting location, and nothing is interned.
    pub fn array_of(
        &mut self,
        element: TypeId,
        size: u32,
        span: Span,
    ) -> Result<TypeId, TypeError> {
        if !self.is_value_type(element) {
            return Err(TypeError::InvalidElementType { element, span });
        }
        Ok(self.intern(Type::Array { element, size }))
    }

    /// Constructs the mutable-storage wrapper type `inout<element>`,
    /// validating the element.
    ///
    /// Same validation discipline as [`array_of`](Self::array_of); in
    /// particular an `inout` can never wrap another `inout`.
    pub fn inout_of(&mut self, element: TypeId, span: Span) -> Result<TypeId, TypeError> {
        if !self.is_value_type(element) {
            return Err(TypeError::InvalidElementType { element, span });
        }
        Ok(self.intern(Type::InOut { element }))
    }

    /// Constructs an aggregate type from an ordered field sequence.
    ///
    /// Field types are NOT validated against the value-type predicate;
    /// aggregate support is staged and deliberately permissive. Identity is
    /// the ordered field sequence compared pairwise by (name, type).
    pub fn struct_of(&mut self, fields: Vec<FieldInfo>) -> TypeId {
        self.intern(Type::Struct { fields })
    }

    /// Returns `true` if the type is usable as a hardware value.
    ///
    /// Value types are the types that can be composed together to describe
    /// synthesized hardware: signless integers and arrays. Marker types like
    /// `inout` and (in this version) aggregates are excluded. Arrays are
    /// accepted unconditionally — their element was already validated when
    /// the array was constructed.
    pub fn is_value_type(&self, id: TypeId) -> bool {
        match self.get(id) {
            Type::Int { signedness, .. } => *signedness == Signedness::Signless,
            Type::Array { .. } => true,
            Type::InOut { .. } | Type::Struct { .. } => false,
        }
    }

    /// Returns the element type of an array or inout type.
    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            Type::Array { element, .. } | Type::InOut { element } => Some(*element),
            _ => None,
        }
    }

    /// Returns the element count of an array type.
    pub fn array_size(&self, id: TypeId) -> Option<u32> {
        match self.get(id) {
            Type::Array { size, .. } => Some(*size),
            _ => None,
        }
    }

    /// Returns the fields of an aggregate type.
    pub fn fields(&self, id: TypeId) -> Option<&[FieldInfo]> {
        match self.get(id) {
            Type::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    /// Looks up a field of an aggregate type by name.
    ///
    /// Linear scan in declaration order; the first match wins. Returns
    /// `None` if `id` is not an aggregate or has no such field.
    pub fn field_type(&self, id: TypeId, name: Ident) -> Option<TypeId> {
        self.fields(id)?
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.ty)
    }

    /// Returns the bit width of a type, if it has a fixed width.
    ///
    /// Integers have their declared width; arrays have element width times
    /// size. `inout` markers and aggregates have no width in this version.
    pub fn bit_width(&self, id: TypeId) -> Option<u32> {
        match self.get(id) {
            Type::Int { width, .. } => Some(*width),
            Type::Array { element, size } => self.bit_width(*element).map(|w| w * size),
            Type::InOut { .. } | Type::Struct { .. } => None,
        }
    }

    /// Returns `true` if the type is the signless single-bit integer `i1`.
    pub fn is_bool(&self, id: TypeId) -> bool {
        matches!(
            self.get(id),
            Type::Int {
                width: 1,
                signedness: Signedness::Signless,
            }
        )
    }

    /// Returns the number of interned types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types have been interned.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairo_common::Interner;

    #[test]
    fn intern_deduplicates() {
        let mut db = TypeDb::new();
        let a = db.int(8);
        let b = db.int(8);
        assert_eq!(a, b);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn distinct_descriptors_distinct_ids() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let i16 = db.int(16);
        let si8 = db.int_with_signedness(8, Signedness::Signed);
        assert_ne!(i8, i16);
        assert_ne!(i8, si8);
        assert_eq!(db.len(), 3);
    }

    #[test]
    fn array_uniquing() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let a = db.array_of(i8, 4, Span::DUMMY).unwrap();
        let b = db.array_of(i8, 4, Span::DUMMY).unwrap();
        let c = db.array_of(i8, 5, Span::DUMMY).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn predicate_accepts_signless_int() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        assert!(db.is_value_type(i8));
    }

    #[test]
    fn predicate_rejects_tagged_ints() {
        let mut db = TypeDb::new();
        let si8 = db.int_with_signedness(8, Signedness::Signed);
        let ui8 = db.int_with_signedness(8, Signedness::Unsigned);
        assert!(!db.is_value_type(si8));
        assert!(!db.is_value_type(ui8));
    }

    #[test]
    fn predicate_accepts_any_array() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let arr = db.array_of(i8, 4, Span::DUMMY).unwrap();
        assert!(db.is_value_type(arr));
    }

    #[test]
    fn predicate_rejects_inout_and_struct() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let io = db.inout_of(i8, Span::DUMMY).unwrap();
        let st = db.struct_of(Vec::new());
        assert!(!db.is_value_type(io));
        assert!(!db.is_value_type(st));
    }

    #[test]
    fn array_of_inout_is_rejected() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let io = db.inout_of(i8, Span::DUMMY).unwrap();
        let before = db.len();
        let err = db.array_of(io, 4, Span::DUMMY).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidElementType {
                element: io,
                span: Span::DUMMY,
            }
        );
        // Nothing was interned on failure.
        assert_eq!(db.len(), before);
    }

    #[test]
    fn inout_of_inout_is_rejected() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let io = db.inout_of(i8, Span::DUMMY).unwrap();
        assert!(db.inout_of(io, Span::DUMMY).is_err());
    }

    #[test]
    fn array_of_array_is_allowed() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let inner = db.array_of(i8, 4, Span::DUMMY).unwrap();
        let outer = db.array_of(inner, 2, Span::DUMMY).unwrap();
        assert!(db.is_value_type(outer));
        assert_eq!(db.element_type(outer), Some(inner));
        assert_eq!(db.array_size(outer), Some(2));
    }

    #[test]
    fn inout_of_array_is_allowed() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let arr = db.array_of(i8, 4, Span::DUMMY).unwrap();
        let io = db.inout_of(arr, Span::DUMMY).unwrap();
        assert_eq!(db.element_type(io), Some(arr));
    }

    #[test]
    fn struct_construction_is_permissive() {
        let mut db = TypeDb::new();
        let interner = Interner::new();
        let i8 = db.int(8);
        // An inout field would fail the value-type predicate, but aggregate
        // construction does not run it.
        let io = db.inout_of(i8, Span::DUMMY).unwrap();
        let st = db.struct_of(vec![
            FieldInfo {
                name: interner.get_or_intern("data"),
                ty: i8,
            },
            FieldInfo {
                name: interner.get_or_intern("port"),
                ty: io,
            },
        ]);
        assert_eq!(db.fields(st).unwrap().len(), 2);
    }

    #[test]
    fn struct_uniquing_is_order_sensitive() {
        let mut db = TypeDb::new();
        let interner = Interner::new();
        let i8 = db.int(8);
        let i16 = db.int(16);
        let a = interner.get_or_intern("a");
        let b = interner.get_or_intern("b");
        let ab = db.struct_of(vec![
            FieldInfo { name: a, ty: i8 },
            FieldInfo { name: b, ty: i16 },
        ]);
        let ab2 = db.struct_of(vec![
            FieldInfo { name: a, ty: i8 },
            FieldInfo { name: b, ty: i16 },
        ]);
        let ba = db.struct_of(vec![
            FieldInfo { name: b, ty: i16 },
            FieldInfo { name: a, ty: i8 },
        ]);
        assert_eq!(ab, ab2);
        assert_ne!(ab, ba);
    }

    #[test]
    fn field_lookup_first_match_wins() {
        let mut db = TypeDb::new();
        let interner = Interner::new();
        let i8 = db.int(8);
        let i16 = db.int(16);
        let x = interner.get_or_intern("x");
        let st = db.struct_of(vec![
            FieldInfo { name: x, ty: i8 },
            FieldInfo { name: x, ty: i16 },
        ]);
        assert_eq!(db.field_type(st, x), Some(i8));
        let missing = interner.get_or_intern("missing");
        assert_eq!(db.field_type(st, missing), None);
    }

    #[test]
    fn bit_widths() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        let arr = db.array_of(i8, 4, Span::DUMMY).unwrap();
        let nested = db.array_of(arr, 2, Span::DUMMY).unwrap();
        let io = db.inout_of(i8, Span::DUMMY).unwrap();
        assert_eq!(db.bit_width(i8), Some(8));
        assert_eq!(db.bit_width(arr), Some(32));
        assert_eq!(db.bit_width(nested), Some(64));
        assert_eq!(db.bit_width(io), None);
    }

    #[test]
    fn is_bool() {
        let mut db = TypeDb::new();
        let i1 = db.int(1);
        let i8 = db.int(8);
        let si1 = db.int_with_signedness(1, Signedness::Signed);
        assert!(db.is_bool(i1));
        assert!(!db.is_bool(i8));
        assert!(!db.is_bool(si1));
    }

    #[test]
    fn serde_roundtrip() {
        let mut db = TypeDb::new();
        let i8 = db.int(8);
        db.array_of(i8, 4, Span::DUMMY).unwrap();
        let json = serde_json::to_string(&db).unwrap();
        let mut restored: TypeDb = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        // Interning into the restored registry still deduplicates.
        assert_eq!(restored.int(8), i8);
    }
}
