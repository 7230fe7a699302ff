//! End-to-end extraction over a full single field analysis printout.

use pretty_assertions::assert_eq;

use vfscan_core::report::missing_critical_fields;
use vfscan_core::{
    extract_tagged, ExtractionReport, ExtractionStatus, Field, ReportParser, TaggedOutput,
    VisualFieldParser, CRITICAL_FIELDS,
};

const REPORT: &str = "Central 24-2 Threshold Test
Patient:
Date of Birth:
Gender:
Doe, Jane
03-14-1958
Female
Patient ID: 004512
Fixation Monitor:
Fixation Target:
Fixation Losses:
False POS Errors:
False NEG Errors:
Test Duration:
Fovea:
Gaze/Blind Spot
Central
0/14
2%
4%
06:42
34 dB
Stimulus:
Background:
Strategy:
III, White
31.5 ASB
SITA Standard
Pupil Diameter:
Visual Acuity:
Rx:
4.1 mm
20/25
+1.25 DS
Date:
Time:
Age:
Aug 12, 2024
10:31 AM
66
Eye Care Centre
1200 Bank Street, Ottawa
OS
Single Field Analysis
Central 24-2 Threshold Test
GHT:
Within normal limits
VFI 97%
MD -1.84 dB P < 10%
PSD 2.05 dB
\x0cPatient ID: 999999
Total Deviation
";

#[test]
fn test_full_report() {
    let result = VisualFieldParser::new().parse(REPORT).unwrap();
    let record = &result.record;

    let expected = [
        (Field::Patient, "Doe Jane"),
        (Field::DateOfBirth, "03-14-1958"),
        (Field::Gender, "Female"),
        (Field::PatientId, "004512"),
        (Field::OfficeLocation, "1200 Bank Street, Ottawa"),
        (Field::TestType, "Central 24-2 Threshold Test"),
        (Field::FixationMonitor, "Gaze/Blind Spot"),
        (Field::FixationTarget, "Central"),
        (Field::FixationLosses, "0/14"),
        (Field::FalsePosErrors, "2%"),
        (Field::FalseNegErrors, "4%"),
        (Field::TestDuration, "06:42"),
        (Field::Fovea, "34 dB"),
        (Field::Stimulus, "III White"),
        (Field::Background, "31.5 ASB"),
        (Field::Strategy, "SITA Standard"),
        (Field::PupilDiameter, "4.1 mm"),
        (Field::VisualAcuity, "20/25"),
        (Field::Rx, "+1.25 DS"),
        (Field::Date, "Aug 12 2024"),
        (Field::Time, "10:31 AM"),
        (Field::Age, "66"),
        (Field::Eye, "OS"),
        (Field::Grid, "24-2"),
        (Field::Md, "-1.84 dB"),
        (Field::Psd, "2.05 dB"),
        (Field::Ght, "Within normal limits"),
    ];

    for (field, value) in expected {
        assert_eq!(record.get(field), Some(value), "field {}", field);
    }

    for field in [Field::Created, Field::Md10_2, Field::Psd10_2, Field::Sf, Field::Cpsd, Field::Vfi] {
        assert_eq!(record.get(field), None, "field {}", field);
    }

    assert_eq!(result.status, ExtractionStatus::Complete);
    assert!(result.warnings.is_empty());
    assert!(missing_critical_fields(record, &CRITICAL_FIELDS).is_empty());
}

#[test]
fn test_tagged_output_round_trip() {
    let tagged = extract_tagged(REPORT).unwrap();
    assert!(tagged.starts_with("[(1)]{\"Patient\":\"Doe Jane\""));

    let parsed = TaggedOutput::parse(&tagged).unwrap();
    assert_eq!(parsed.to_string(), tagged);

    let report = ExtractionReport::from_tagged(&tagged, &CRITICAL_FIELDS).unwrap();
    assert_eq!(report.message, "PDF text extraction successful");
}

#[test]
fn test_repeated_calls_are_identical() {
    let outputs: Vec<String> = (0..3).map(|_| extract_tagged(REPORT).unwrap()).collect();
    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[1], outputs[2]);
}

#[test]
fn test_parallel_calls_share_nothing() {
    let parser = VisualFieldParser::new();
    let expected = parser.parse(REPORT).unwrap().into_tagged().to_string();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| parser.parse(REPORT).unwrap().into_tagged().to_string()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_report_without_identity() {
    let text = "Single Field Analysis\nPSD  3.21 dB\nStrategy: SITA Fast\n";
    let tagged = extract_tagged(text).unwrap();
    assert!(tagged.starts_with("[(0)]"));

    let report = ExtractionReport::from_tagged(&tagged, &CRITICAL_FIELDS).unwrap();
    assert_eq!(
        report.message,
        "PDF text extraction partially successful. Missing critical fields: Patient, Patient ID, Date of Birth, Test Type"
    );
    assert_eq!(report.data.text.get(Field::Psd), Some("3.21 dB"));
    assert_eq!(report.data.text.get(Field::Strategy), Some("SITA Fast"));
}
