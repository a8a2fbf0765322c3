//! # Structural Mapper
//!
//! Projects a record into a differently shaped record by copying same-named
//! fields. It is how entities become the lightweight summary and response
//! shapes without a hand-written conversion per pair.
//!
//! ## Validation Up Front
//!
//! A [`Mapper`] is built once per `(source, target)` pair, normally when the
//! API facade starts. Building it pairs every target field with the source
//! field of the same name and checks that the pair is assignable:
//!
//! - same [`FieldKind`](crate::fields::FieldKind), and same members for enums
//! - an optional source field cannot feed a required target field
//!
//! A mismatch is a `Mapping` error at construction, never a silent skip at
//! conversion time. Target fields with no same-named source field are left at
//! their default; [`Mapper::strict`] rejects those too.

use std::marker::PhantomData;

use crate::error::{Result, TicketsError};
use crate::fields::{Assign, Record};

#[derive(Debug, Clone, Copy)]
struct FieldPair<S: Copy, T: Copy> {
    source: S,
    target: T,
    name: &'static str,
}

/// Validated field-by-field projection from `S` into `T`.
#[derive(Debug, Clone)]
pub struct Mapper<S: Record, T: Assign> {
    pairs: Vec<FieldPair<S::Field, T::Field>>,
    defaulted: Vec<&'static str>,
    _shape: PhantomData<fn(&S) -> T>,
}

impl<S: Record, T: Assign> Mapper<S, T> {
    /// Pair up same-named fields, rejecting pairs that cannot be assigned.
    pub fn new() -> Result<Self> {
        let mut pairs = Vec::new();
        let mut defaulted = Vec::new();

        for target in T::FIELDS {
            let Some(source) = S::field_named(target.name) else {
                defaulted.push(target.name);
                continue;
            };

            if source.kind != target.kind {
                return Err(Self::mismatch(
                    target.name,
                    format!("is {:?} in source but {:?} in target", source.kind, target.kind),
                ));
            }
            if source.members != target.members {
                return Err(Self::mismatch(
                    target.name,
                    "has different enum members in source and target".to_string(),
                ));
            }
            if source.nullable && !target.nullable {
                return Err(Self::mismatch(
                    target.name,
                    "is optional in source but required in target".to_string(),
                ));
            }

            pairs.push(FieldPair {
                source: source.field,
                target: target.field,
                name: target.name,
            });
        }

        Ok(Self {
            pairs,
            defaulted,
            _shape: PhantomData,
        })
    }

    /// Like [`Mapper::new`], but every target field must have a source.
    pub fn strict() -> Result<Self> {
        let mapper = Self::new()?;
        if let Some(&name) = mapper.defaulted.first() {
            return Err(Self::mismatch(name, "has no source field".to_string()));
        }
        Ok(mapper)
    }

    fn mismatch(field: &'static str, reason: String) -> TicketsError {
        TicketsError::Mapping {
            from: S::NAME,
            into: T::NAME,
            field,
            reason,
        }
    }

    /// Names of the target fields that are copied.
    pub fn copied_fields(&self) -> Vec<&'static str> {
        self.pairs.iter().map(|pair| pair.name).collect()
    }

    /// Names of the target fields left at their default.
    pub fn defaulted_fields(&self) -> &[&'static str] {
        &self.defaulted
    }

    /// Project `source` into a default `T`.
    pub fn convert(&self, source: &S) -> Result<T> {
        self.convert_into(source, T::default())
    }

    /// Project `source` onto `template`, overwriting the paired fields.
    pub fn convert_into(&self, source: &S, mut template: T) -> Result<T> {
        for pair in &self.pairs {
            let value = source.get(pair.source);
            template.set(pair.target, value).map_err(|rejected| {
                Self::mismatch(pair.name, format!("rejected value {}", rejected))
            })?;
        }
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldKind, FieldSpec, FieldValue};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum AbcField {
        A,
        B,
        C,
    }

    #[derive(Debug)]
    struct Abc {
        a: i64,
        b: String,
        c: String,
    }

    impl Record for Abc {
        type Field = AbcField;
        const NAME: &'static str = "abc";
        const FIELDS: &'static [FieldSpec<AbcField>] = &[
            FieldSpec::new(AbcField::A, "a", FieldKind::Integer),
            FieldSpec::new(AbcField::B, "b", FieldKind::Text),
            FieldSpec::new(AbcField::C, "c", FieldKind::Text),
        ];

        fn get(&self, field: AbcField) -> FieldValue {
            match field {
                AbcField::A => FieldValue::Integer(self.a),
                AbcField::B => FieldValue::Text(self.b.clone()),
                AbcField::C => FieldValue::Text(self.c.clone()),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum AcdField {
        A,
        C,
        D,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Acd {
        a: i64,
        c: String,
        d: bool,
    }

    impl Record for Acd {
        type Field = AcdField;
        const NAME: &'static str = "acd";
        const FIELDS: &'static [FieldSpec<AcdField>] = &[
            FieldSpec::new(AcdField::A, "a", FieldKind::Integer),
            FieldSpec::new(AcdField::C, "c", FieldKind::Text),
            FieldSpec::new(AcdField::D, "d", FieldKind::Bool),
        ];

        fn get(&self, field: AcdField) -> FieldValue {
            match field {
                AcdField::A => FieldValue::Integer(self.a),
                AcdField::C => FieldValue::Text(self.c.clone()),
                AcdField::D => FieldValue::Bool(self.d),
            }
        }
    }

    impl Assign for Acd {
        fn set(&mut self, field: AcdField, value: FieldValue) -> std::result::Result<(), FieldValue> {
            match (field, value) {
                (AcdField::A, FieldValue::Integer(v)) => self.a = v,
                (AcdField::C, FieldValue::Text(v)) => self.c = v,
                (AcdField::D, FieldValue::Bool(v)) => self.d = v,
                (_, other) => return Err(other),
            }
            Ok(())
        }
    }

    /// Same names as `Acd`, but `c` is an integer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum BadField {
        C,
    }

    #[derive(Debug, Default)]
    struct Bad {
        c: i64,
    }

    impl Record for Bad {
        type Field = BadField;
        const NAME: &'static str = "bad";
        const FIELDS: &'static [FieldSpec<BadField>] =
            &[FieldSpec::new(BadField::C, "c", FieldKind::Integer)];

        fn get(&self, _: BadField) -> FieldValue {
            FieldValue::Integer(self.c)
        }
    }

    impl Assign for Bad {
        fn set(&mut self, _: BadField, value: FieldValue) -> std::result::Result<(), FieldValue> {
            match value {
                FieldValue::Integer(v) => {
                    self.c = v;
                    Ok(())
                }
                other => Err(other),
            }
        }
    }

    fn abc() -> Abc {
        Abc {
            a: 7,
            b: "dropped".into(),
            c: "kept".into(),
        }
    }

    #[test]
    fn partial_copy_leaves_unmatched_target_fields_at_default() {
        let mapper = Mapper::<Abc, Acd>::new().unwrap();
        let out = mapper.convert(&abc()).unwrap();
        assert_eq!(
            out,
            Acd {
                a: 7,
                c: "kept".into(),
                d: false
            }
        );
        assert_eq!(mapper.copied_fields(), vec!["a", "c"]);
        assert_eq!(mapper.defaulted_fields(), &["d"]);
    }

    #[test]
    fn convert_into_keeps_template_values_for_unmatched_fields() {
        let mapper = Mapper::<Abc, Acd>::new().unwrap();
        let template = Acd {
            a: 0,
            c: String::new(),
            d: true,
        };
        let out = mapper.convert_into(&abc(), template).unwrap();
        assert!(out.d);
        assert_eq!(out.a, 7);
    }

    #[test]
    fn strict_rejects_unmatched_target_fields() {
        let err = Mapper::<Abc, Acd>::strict().unwrap_err();
        assert!(matches!(err, TicketsError::Mapping { field: "d", .. }));
    }

    #[test]
    fn kind_mismatch_is_rejected_at_construction() {
        let err = Mapper::<Abc, Bad>::new().unwrap_err();
        match err {
            TicketsError::Mapping {
                from, into, field, ..
            } => {
                assert_eq!((from, into, field), ("abc", "bad", "c"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
