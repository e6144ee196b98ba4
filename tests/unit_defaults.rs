//! Default unit label behavior over arbitrary parameter mappings

#[cfg(test)]
mod unit_default_tests {
    use iprkit::input::{apply_default_units, Role, UnitKeys};
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_canonical_defaults() {
        let mut input: BTreeMap<String, String> = BTreeMap::new();
        apply_default_units(&mut input, &UnitKeys::default());

        let expected: BTreeMap<String, String> = [
            ("length_unit", "angstrom"),
            ("energy_unit", "eV"),
            ("pressure_unit", "GPa"),
            ("force_unit", "eV/angstrom"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(input, expected);
    }

    #[test]
    fn test_yaml_values_of_any_type_survive() {
        let mut input: BTreeMap<String, serde_yaml::Value> =
            serde_yaml::from_str("length_unit: nm\nenergy_unit: [1, 2]\ncomment: keep me\n").unwrap();
        apply_default_units(&mut input, &UnitKeys::default());

        assert_eq!(input["length_unit"], serde_yaml::Value::from("nm"));
        assert!(input["energy_unit"].is_sequence());
        assert_eq!(input["pressure_unit"], serde_yaml::Value::from("GPa"));
        assert_eq!(input["comment"], serde_yaml::Value::from("keep me"));
    }

    #[test]
    fn test_roles_are_ordered() {
        let keys: Vec<_> = Role::ALL.iter().map(|r| r.canonical_key()).collect();
        assert_eq!(keys, vec!["length_unit", "energy_unit", "pressure_unit", "force_unit"]);
    }

    #[test]
    fn test_hashmap_with_custom_keys() {
        let mut input: HashMap<String, String> = HashMap::new();
        let keys = UnitKeys::default()
            .with_length_key("r_unit")
            .with_energy_key("E_unit")
            .with_pressure_key("P_unit")
            .with_force_key("F_unit");
        apply_default_units(&mut input, &keys);

        assert_eq!(input["r_unit"], "angstrom");
        assert_eq!(input["E_unit"], "eV");
        assert_eq!(input["P_unit"], "GPa");
        assert_eq!(input["F_unit"], "eV/angstrom");
        assert_eq!(input.len(), 4);
    }
}

#[cfg(test)]
mod unit_default_properties {
    use iprkit::input::{apply_default_units, Role, UnitKeys};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn arb_input() -> impl Strategy<Value = BTreeMap<String, String>> {
        prop::collection::btree_map(
            prop_oneof![
                Just("length_unit".to_string()),
                Just("energy_unit".to_string()),
                Just("pressure_unit".to_string()),
                Just("force_unit".to_string()),
                "[a-z_]{1,12}",
            ],
            "[A-Za-z/]{0,10}",
            0..8,
        )
    }

    proptest! {
        #[test]
        fn second_application_is_a_no_op(mut input in arb_input()) {
            apply_default_units(&mut input, &UnitKeys::default());
            let once = input.clone();
            apply_default_units(&mut input, &UnitKeys::default());
            prop_assert_eq!(input, once);
        }

        #[test]
        fn existing_values_are_never_overwritten(input in arb_input()) {
            let mut filled = input.clone();
            apply_default_units(&mut filled, &UnitKeys::default());

            for (key, value) in &input {
                prop_assert_eq!(&filled[key], value);
            }
            for role in Role::ALL {
                prop_assert!(filled.contains_key(role.canonical_key()));
            }
            prop_assert!(filled.len() <= input.len() + 4);
        }
    }
}
