#![cfg(test)]

use asn2proto::naming::{to_pascal_case, to_snake_case, SnakeCase};

#[test]
fn test_pascal_case() {
    assert_eq!(to_pascal_case("sub-network"), "SubNetwork");
    assert_eq!(to_pascal_case("plmn identity"), "PlmnIdentity");
    assert_eq!(to_pascal_case("&procedureCode"), "ProcedureCode");
    assert_eq!(to_pascal_case("ProtocolIEs"), "ProtocolIes");

    // ALL-CAPS acronyms collapse to one leading capital
    assert_eq!(to_pascal_case("SNSSAI"), "Snssai");
}

#[test]
fn test_snake_case_lower() {
    assert_eq!(to_snake_case("SubNetwork", SnakeCase::Lower), "sub_network");
    assert_eq!(to_snake_case("sessionID", SnakeCase::Lower), "session_id");
    assert_eq!(to_snake_case("&id", SnakeCase::Lower), "id");
    assert_eq!(to_snake_case("plmn-Identity", SnakeCase::Lower), "plmn_identity");
}

#[test]
fn test_snake_case_upper() {
    assert_eq!(to_snake_case("ProcedureCode", SnakeCase::Upper), "PROCEDURE_CODE");
    assert_eq!(to_snake_case("red", SnakeCase::Upper), "RED");
    assert_eq!(to_snake_case("&id", SnakeCase::Upper), "ID");
}

#[test]
fn test_idempotent() {
    for input in ["SubNetwork", "Snssai", "ProtocolIes"] {
        assert_eq!(to_pascal_case(input), input);
    }
    for input in ["sub_network", "session_id", "value"] {
        assert_eq!(to_snake_case(input, SnakeCase::Lower), input);
    }
    for input in ["PROCEDURE_CODE", "RED", "MAX_VALUE"] {
        assert_eq!(to_snake_case(input, SnakeCase::Upper), input);
    }
}
