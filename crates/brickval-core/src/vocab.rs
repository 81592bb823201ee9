//! Well-known vocabulary IRIs

pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

pub mod rdfs {
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
}

pub mod owl {
    pub const ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    pub const IMPORTS: &str = "http://www.w3.org/2002/07/owl#imports";
    pub const VERSION_IRI: &str = "http://www.w3.org/2002/07/owl#versionIRI";
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
}

pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
    pub const BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    pub const NON_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonPositiveInteger";
    pub const POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";
    pub const NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#negativeInteger";
    pub const UNSIGNED_INT: &str = "http://www.w3.org/2001/XMLSchema#unsignedInt";
    pub const UNSIGNED_LONG: &str = "http://www.w3.org/2001/XMLSchema#unsignedLong";
    pub const UNSIGNED_SHORT: &str = "http://www.w3.org/2001/XMLSchema#unsignedShort";
    pub const UNSIGNED_BYTE: &str = "http://www.w3.org/2001/XMLSchema#unsignedByte";

    const NUMERIC: &[&str] = &[
        INTEGER,
        DECIMAL,
        DOUBLE,
        FLOAT,
        INT,
        LONG,
        SHORT,
        BYTE,
        NON_NEGATIVE_INTEGER,
        NON_POSITIVE_INTEGER,
        POSITIVE_INTEGER,
        NEGATIVE_INTEGER,
        UNSIGNED_INT,
        UNSIGNED_LONG,
        UNSIGNED_SHORT,
        UNSIGNED_BYTE,
    ];

    pub fn is_numeric(datatype: &str) -> bool {
        NUMERIC.contains(&datatype)
    }

    /// Integer-valued subtypes of xsd:decimal
    pub fn is_integer(datatype: &str) -> bool {
        is_numeric(datatype) && ![DECIMAL, DOUBLE, FLOAT].contains(&datatype)
    }

    /// Inclusive value bounds of an integer datatype; `None` is unbounded
    pub fn integer_bounds(datatype: &str) -> (Option<i128>, Option<i128>) {
        match datatype {
            NON_NEGATIVE_INTEGER => (Some(0), None),
            POSITIVE_INTEGER => (Some(1), None),
            NON_POSITIVE_INTEGER => (None, Some(0)),
            NEGATIVE_INTEGER => (None, Some(-1)),
            LONG => (Some(i64::MIN.into()), Some(i64::MAX.into())),
            INT => (Some(i32::MIN.into()), Some(i32::MAX.into())),
            SHORT => (Some(i16::MIN.into()), Some(i16::MAX.into())),
            BYTE => (Some(i8::MIN.into()), Some(i8::MAX.into())),
            UNSIGNED_LONG => (Some(0), Some(u64::MAX.into())),
            UNSIGNED_INT => (Some(0), Some(u32::MAX.into())),
            UNSIGNED_SHORT => (Some(0), Some(u16::MAX.into())),
            UNSIGNED_BYTE => (Some(0), Some(u8::MAX.into())),
            _ => (None, None),
        }
    }
}
