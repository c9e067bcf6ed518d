#[cfg(test)]
mod alignment {
    use house_price::{
        align,
        features::aligner::{BASE_COLUMNS, FURNISHED_COLUMN, LABEL_COLUMN},
        models::house::{FurnishingStatus, RawInput, YesNo},
        ModelSchema,
    };

    fn label_names() -> Vec<String> {
        let mut names: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        names.push(LABEL_COLUMN.to_string());
        names
    }

    fn sample() -> RawInput {
        RawInput {
            area: 7420,
            bedrooms: 4,
            bathrooms: 2,
            stories: 3,
            parking: 2,
            mainroad: YesNo::Yes,
            guestroom: YesNo::No,
            basement: YesNo::No,
            hotwaterheating: YesNo::No,
            airconditioning: YesNo::Yes,
            prefarea: YesNo::Yes,
            furnishingstatus: FurnishingStatus::SemiFurnished,
            location: "Lahore".to_string(),
        }
    }

    #[test]
    fn columns_follow_expected_names_exactly() {
        let schema = ModelSchema {
            expected_count: Some(12),
            expected_names: Some(label_names()),
            encoding: None,
        };
        let row = align(&sample(), &schema);

        let expected = label_names();
        assert_eq!(row.names(), expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(
            row.values(),
            vec![7420.0, 4.0, 2.0, 3.0, 1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0, 1.0]
        );
    }

    #[test]
    fn shuffled_names_reorder_the_row() {
        let names: Vec<String> = ["prefarea", "area", "furnishingstatus_semi-furnished", "bedrooms"]
            .iter()
            .map(|n| n.to_string())
            .collect();
        let schema = ModelSchema {
            expected_count: None,
            expected_names: Some(names),
            encoding: None,
        };
        let row = align(&sample(), &schema);

        assert_eq!(
            row.names(),
            vec!["prefarea", "area", "furnishingstatus_semi-furnished", "bedrooms"]
        );
        assert_eq!(row.values(), vec![1.0, 7420.0, 1.0, 4.0]);
        assert_eq!(row.get(FURNISHED_COLUMN), None);
    }

    #[test]
    fn unknown_expected_names_are_zero_filled() {
        let mut names = label_names();
        names.push("year_built".to_string());
        let schema = ModelSchema {
            expected_count: Some(12),
            expected_names: Some(names),
            encoding: None,
        };
        let row = align(&sample(), &schema);

        assert_eq!(row.len(), 13);
        assert_eq!(row.get("year_built"), Some(0.0));
        assert_eq!(row.get(LABEL_COLUMN), Some(1.0));
    }

    #[test]
    fn one_hot_names_with_label_count_pad_missing_indicators() {
        // The count says label encoding, the names say one-hot: indicators
        // are not produced so they come back as zero.
        let mut names: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        names.push("furnishingstatus_semi-furnished".to_string());
        let schema = ModelSchema {
            expected_count: Some(12),
            expected_names: Some(names),
            encoding: None,
        };
        let row = align(&sample(), &schema);
        assert_eq!(row.get("furnishingstatus_semi-furnished"), Some(0.0));
    }

    #[test]
    fn aligning_twice_is_identical() {
        let schema = ModelSchema {
            expected_count: Some(13),
            expected_names: None,
            encoding: None,
        };
        assert_eq!(align(&sample(), &schema), align(&sample(), &schema));
    }
}
