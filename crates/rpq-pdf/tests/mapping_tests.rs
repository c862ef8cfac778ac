use serde_json::json;
use time::Date;
use time::macros::date;

use rpq_form::{
    AnswerRecord, BirthCountry, CountryOfCitizenship, ExceptionAnswer, FirearmType, FormType,
    TriState, YesNo,
};
use rpq_pdf::{FieldOp, map_record};

const TODAY: Date = date!(2024 - 03 - 05);

#[test]
fn empty_record_still_prints_todays_date() {
    let mapping = map_record(&AnswerRecord::default(), TODAY);
    assert_eq!(mapping.len(), 1);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].DateField9[0]"),
        Some(&FieldOp::text("03/05/2024"))
    );
}

#[test]
fn recorded_certification_date_wins_over_today() {
    let record = AnswerRecord {
        certification_date: Some(date!(2024 - 03 - 01)),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].DateField9[0]"),
        Some(&FieldOp::text("03/01/2024"))
    );
}

#[test]
fn form_type_and_applicant_lines() {
    let record = AnswerRecord {
        form_type: Some(FormType::Form4),
        transferee_name: Some("jane doe".into()),
        transferee_address: Some("1 main st".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].form4[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(mapping.get("topmostSubform[0].Page1[0].form1[0]"), None);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].applicantaddress[0]"),
        Some(&FieldOp::text("JANE DOE\n1 MAIN ST"))
    );
}

#[test]
fn same_address_inherits_when_the_flag_is_unset() {
    let record = AnswerRecord {
        transferee_address: Some("1 main st".into()),
        ..AnswerRecord::default()
    };
    assert_eq!(record.same_address_as_transferee, TriState::Unset);
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].responsibleaddress[0]"),
        Some(&FieldOp::text("1 MAIN ST"))
    );
}

#[test]
fn explicit_not_same_address_does_not_inherit() {
    let record = AnswerRecord {
        transferee_address: Some("1 main st".into()),
        same_address_as_transferee: TriState::False,
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].responsibleaddress[0]"),
        None
    );
}

#[test]
fn own_home_address_wins_over_inheritance() {
    let record = AnswerRecord {
        transferee_address: Some("1 main st".into()),
        responsible_name: Some("jane doe".into()),
        responsible_home_address: Some("9 elm ave".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].responsibleaddress[0]"),
        Some(&FieldOp::text("JANE DOE\n9 ELM AVE"))
    );
}

#[test]
fn date_of_birth_formats_as_month_day_year() {
    let record = AnswerRecord {
        date_of_birth: Some(date!(1985 - 07 - 14)),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].#field[24]"),
        Some(&FieldOp::text("07/14/1985"))
    );
}

#[test]
fn prohibitor_no_selects_exactly_one_box() {
    let record = AnswerRecord {
        transfer_intent: Some(YesNo::No),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].CheckBoxno6a[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].CheckBoxYes6a[0]"),
        None
    );
    let checkbox_writes = mapping
        .writes()
        .iter()
        .filter(|write| write.field.contains("CheckBox"))
        .count();
    assert_eq!(checkbox_writes, 1);
}

#[test]
fn every_prohibitor_answer_lands_on_its_own_pair() {
    let record = AnswerRecord {
        transfer_intent: Some(YesNo::Yes),
        resale_intent: Some(YesNo::No),
        under_indictment: Some(YesNo::No),
        felony_conviction: Some(YesNo::Yes),
        nonimmigrant_visa: Some(YesNo::No),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].CheckBoxYes6a[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].CheckBoxno6b[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].CheckBoxno1[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].CheckBoxYes2[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].CheckBoxno11[0]"),
        Some(&FieldOp::Select)
    );
}

#[test]
fn nonimmigrant_exception_routes_to_three_outcomes() {
    for (answer, widget) in [
        (
            ExceptionAnswer::Yes,
            "topmostSubform[0].Page2[0].CheckBoxYes12[0]",
        ),
        (
            ExceptionAnswer::No,
            "topmostSubform[0].Page2[0].CheckBoxno12[0]",
        ),
        (
            ExceptionAnswer::NotApplicable,
            "topmostSubform[0].Page2[0].CheckBoxNA[0]",
        ),
    ] {
        let record = AnswerRecord {
            nonimmigrant_exception: Some(answer),
            ..AnswerRecord::default()
        };
        let mapping = map_record(&record, TODAY);
        assert_eq!(mapping.get(widget), Some(&FieldOp::Select));
    }
}

#[test]
fn other_firearm_type_prints_its_description() {
    let record = AnswerRecord {
        firearm_type: Some(FirearmType::Other),
        firearm_type_other: Some("pen gun".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].firearmtype[0]"),
        Some(&FieldOp::text("PEN GUN"))
    );
}

#[test]
fn other_firearm_type_without_description_prints_other() {
    let record = AnswerRecord {
        firearm_type: Some(FirearmType::Other),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].firearmtype[0]"),
        Some(&FieldOp::text("OTHER"))
    );
}

#[test]
fn named_firearm_types_print_their_token() {
    let record = AnswerRecord {
        firearm_type: Some(FirearmType::ShortBarreledRifle),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].firearmtype[0]"),
        Some(&FieldOp::text("SHORT-BARRELED RIFLE"))
    );
}

#[test]
fn law_enforcement_lines_compact_upward() {
    // No agency name: the official line moves up to the first slot.
    let record = AnswerRecord {
        official_name: Some("chief smith".into()),
        official_title: Some("chief of police".into()),
        agency_address: Some("500 center st".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].TextField3[0]"),
        Some(&FieldOp::text("CHIEF SMITH, CHIEF OF POLICE"))
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].TextField4[0]"),
        Some(&FieldOp::text("500 CENTER ST"))
    );
    assert_eq!(mapping.get("topmostSubform[0].Page1[0].TextField5[0]"), None);
}

#[test]
fn official_without_title_prints_name_alone() {
    let record = AnswerRecord {
        agency_name: Some("dallas pd".into()),
        official_name: Some("chief smith".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].TextField3[0]"),
        Some(&FieldOp::text("DALLAS PD"))
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].TextField4[0]"),
        Some(&FieldOp::text("CHIEF SMITH"))
    );
}

#[test]
fn upin_number_is_emitted_only_after_yes() {
    let record = AnswerRecord {
        has_upin: Some(YesNo::Yes),
        upin_number: Some("up12345x".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].yes17[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].please17[0]"),
        Some(&FieldOp::text("UP12345X"))
    );

    let record = AnswerRecord {
        has_upin: Some(YesNo::No),
        upin_number: Some("up12345x".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].no17[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(mapping.get("topmostSubform[0].Page2[0].please17[0]"), None);
}

#[test]
fn citizenship_fans_out_per_member() {
    let record = AnswerRecord {
        citizenship: Some(vec![
            CountryOfCitizenship::Usa,
            CountryOfCitizenship::Other,
        ]),
        citizenship_other: Some("canada".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].usacheckbox[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].othercountrycheckbox[0]"),
        Some(&FieldOp::Select)
    );
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].Othercountry[0]"),
        Some(&FieldOp::text("CANADA"))
    );
}

#[test]
fn other_citizenship_without_country_emits_nothing() {
    let record = AnswerRecord {
        citizenship: Some(vec![CountryOfCitizenship::Other]),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].othercountrycheckbox[0]"),
        None
    );
    assert_eq!(mapping.get("topmostSubform[0].Page2[0].Othercountry[0]"), None);
}

#[test]
fn birth_country_usa_prints_the_long_name() {
    let record = AnswerRecord {
        birth_country: Some(BirthCountry::Usa),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].statecountry[0]"),
        Some(&FieldOp::text("UNITED STATES OF AMERICA"))
    );

    let record = AnswerRecord {
        birth_country: Some(BirthCountry::Other),
        birth_country_other: Some("ireland".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(
        mapping.get("topmostSubform[0].Page2[0].statecountry[0]"),
        Some(&FieldOp::text("IRELAND"))
    );

    let record = AnswerRecord {
        birth_country: Some(BirthCountry::Other),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    assert_eq!(mapping.get("topmostSubform[0].Page2[0].statecountry[0]"), None);
}

#[test]
fn mapping_is_deterministic() {
    let record = AnswerRecord {
        form_type: Some(FormType::Form1),
        transferee_name: Some("jane doe".into()),
        transfer_intent: Some(YesNo::Yes),
        citizenship: Some(vec![CountryOfCitizenship::Usa]),
        ..AnswerRecord::default()
    };
    let first = map_record(&record, TODAY);
    let second = map_record(&record, TODAY);
    assert_eq!(first, second);
    let first_json = serde_json::to_string(&first).expect("serialize");
    let second_json = serde_json::to_string(&second).expect("serialize");
    assert_eq!(first_json, second_json);
}

#[test]
fn writes_follow_question_order() {
    let record = AnswerRecord {
        form_type: Some(FormType::Form1),
        transferee_name: Some("jane doe".into()),
        ssn: Some("123456789".into()),
        alien_number: Some("a123".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    let fields: Vec<&str> = mapping
        .writes()
        .iter()
        .map(|write| write.field.as_str())
        .collect();
    assert_eq!(
        fields,
        vec![
            "topmostSubform[0].Page1[0].form1[0]",
            "topmostSubform[0].Page1[0].applicantaddress[0]",
            "topmostSubform[0].Page1[0].ssn2f[0]",
            "topmostSubform[0].Page2[0].TextFieldalien[0]",
            "topmostSubform[0].Page2[0].DateField9[0]",
        ]
    );
}

#[test]
fn duplicate_writes_keep_the_first() {
    let mut mapping = rpq_pdf::FieldMapping::default();
    mapping.set("topmostSubform[0].Page1[0].Model[0]", FieldOp::text("M1"));
    mapping.set("topmostSubform[0].Page1[0].Model[0]", FieldOp::text("M2"));
    assert_eq!(mapping.len(), 1);
    assert_eq!(
        mapping.get("topmostSubform[0].Page1[0].Model[0]"),
        Some(&FieldOp::text("M1"))
    );
}

#[test]
fn plans_serialize_with_tagged_operations() {
    let record = AnswerRecord {
        form_type: Some(FormType::Form5),
        model: Some("m1".into()),
        ..AnswerRecord::default()
    };
    let mapping = map_record(&record, TODAY);
    let value = serde_json::to_value(&mapping).expect("serialize plan");
    assert_eq!(
        value[0],
        json!({"field": "topmostSubform[0].Page1[0].form5[0]", "op": "select"})
    );
    assert_eq!(
        value[1],
        json!({
            "field": "topmostSubform[0].Page1[0].Model[0]",
            "op": "set_text",
            "value": "M1"
        })
    );
    let back: rpq_pdf::FieldMapping = serde_json::from_value(value).expect("deserialize plan");
    assert_eq!(back, mapping);
}
