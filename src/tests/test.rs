#[cfg(test)]
pub mod tests {
    use crate::*;
    use arrow::array::AsArray;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use object_store::{memory::InMemory, ObjectStore};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReader;
    use rand::prelude::*;
    use rand_distr::{Distribution, Normal, Uniform};
    use std::sync::Arc;

    const ROUND_TRIP_TOL: f64 = 1e-9;

    fn resolver() -> PercentileResolver<'static> {
        PercentileResolver::default()
    }

    fn query(metric: MetricKind, sex: Sex, age: f64, value: f64) -> MeasurementQuery {
        MeasurementQuery::new(metric, sex, age, value)
    }

    fn record(age_index: u32, sex: Sex, m: f64) -> LmsRecord {
        let lms = Lms::new(1.0, m, 0.04);
        LmsRecord::new(age_index, sex, lms, lms.sd_reference())
    }

    fn app_state() -> Arc<AppState> {
        Arc::new(AppState::new(&REFERENCE_TABLE, ReportFormatter::default()))
    }

    // --- Reference table tests ---
    #[test]
    fn test_embedded_partitions() {
        let table = ReferenceTable::embedded().unwrap();
        assert_eq!(table.partitions().count(), 5);
        assert!(table.contains(MetricKind::HeadCircumference, Sex::Female));
        assert!(!table.contains(MetricKind::HeadCircumference, Sex::Male));
        assert_eq!(table.bounds(MetricKind::HeadCircumference, Sex::Female).unwrap(), (0, 13));
        assert_eq!(table.bounds(MetricKind::Weight, Sex::Male).unwrap(), (0, 12));
    }

    #[test]
    fn test_lookup_exact_and_between() {
        let table = &*REFERENCE_TABLE;

        match table.lookup(MetricKind::Height, Sex::Male, 4.0).unwrap() {
            TableLookup::Exact(record) => assert_eq!(record.age_index, 4),
            other => panic!("Expected exact match, got {:?}", other),
        }

        match table.lookup(MetricKind::Height, Sex::Male, 4.25).unwrap() {
            TableLookup::Between { lower, upper } => {
                assert_eq!(lower.age_index, 4);
                assert_eq!(upper.age_index, 5);
            }
            other => panic!("Expected bracketing pair, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_bounds_inclusive() {
        let table = &*REFERENCE_TABLE;
        let hc = MetricKind::HeadCircumference;

        assert!(matches!(table.lookup(hc, Sex::Female, 0.0), Ok(TableLookup::Exact(_))));
        assert!(matches!(table.lookup(hc, Sex::Female, 13.0), Ok(TableLookup::Exact(_))));

        match table.lookup(hc, Sex::Female, 14.0) {
            Err(Error::OutOfRange { min, max, .. }) => {
                assert_eq!(min, 0);
                assert_eq!(max, 13);
            }
            other => panic!("Expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_below_minimum() {
        let records = vec![
            record(2, Sex::Female, 50.0),
            record(3, Sex::Female, 52.0),
            record(4, Sex::Female, 54.0),
        ];
        let table = ReferenceTable::new()
            .with_partition(MetricKind::Height, Sex::Female, records)
            .unwrap();

        assert!(matches!(
            table.lookup(MetricKind::Height, Sex::Female, 2.0),
            Ok(TableLookup::Exact(_))
        ));
        assert!(matches!(
            table.lookup(MetricKind::Height, Sex::Female, 1.0),
            Err(Error::OutOfRange { min: 2, max: 4, .. })
        ));
        assert!(matches!(
            table.lookup(MetricKind::Height, Sex::Female, 5.0),
            Err(Error::OutOfRange { min: 2, max: 4, .. })
        ));
    }

    #[test]
    fn test_partition_invariants_rejected() {
        let unsorted = vec![record(1, Sex::Male, 50.0), record(1, Sex::Male, 51.0)];
        assert!(matches!(
            ReferenceTable::new().with_partition(MetricKind::Height, Sex::Male, unsorted),
            Err(Error::InvalidTable(_))
        ));

        let mut bad_median = record(0, Sex::Male, 50.0);
        bad_median.m = 0.0;
        assert!(matches!(
            ReferenceTable::new().with_partition(MetricKind::Height, Sex::Male, vec![bad_median]),
            Err(Error::InvalidTable(_))
        ));

        let mut bad_cv = record(0, Sex::Male, 50.0);
        bad_cv.s = -0.1;
        assert!(matches!(
            ReferenceTable::new().with_partition(MetricKind::Height, Sex::Male, vec![bad_cv]),
            Err(Error::InvalidTable(_))
        ));

        let wrong_sex = vec![record(0, Sex::Female, 50.0)];
        assert!(matches!(
            ReferenceTable::new().with_partition(MetricKind::Height, Sex::Male, wrong_sex),
            Err(Error::InvalidTable(_))
        ));

        assert!(matches!(
            ReferenceTable::new().with_partition(MetricKind::Height, Sex::Male, Vec::new()),
            Err(Error::InvalidTable(_))
        ));

        let duplicate = ReferenceTable::new()
            .with_partition(MetricKind::Height, Sex::Male, vec![record(0, Sex::Male, 50.0)])
            .unwrap()
            .with_partition(MetricKind::Height, Sex::Male, vec![record(0, Sex::Male, 50.0)]);
        assert!(matches!(duplicate, Err(Error::InvalidTable(_))));
    }

    // --- Resolver tests ---
    #[test]
    fn test_median_resolves_to_zero_at_every_tabulated_age() {
        let resolver = resolver();
        for (metric, sex, records) in REFERENCE_TABLE.partitions() {
            for record in records {
                let result = resolver
                    .resolve(&query(metric, sex, record.age_index as f64, record.m))
                    .unwrap();
                assert!(
                    result.z_score.abs() < 1e-12,
                    "{}/{} age {}: z = {}",
                    metric, sex, record.age_index, result.z_score
                );
                assert!(result.source.is_exact());
                assert_eq!(result.band, SdBand::Sd0ToSd1);
            }
        }
    }

    #[test]
    fn test_head_circumference_girl_at_birth() {
        let result = resolver()
            .resolve(&query(MetricKind::HeadCircumference, Sex::Female, 0.0, 33.8787))
            .unwrap();

        assert!(result.z_score.abs() < 1e-12);
        assert!((result.percentile - 50.0).abs() < 1e-9);
        assert!(!result.approximate);

        let message = ReportFormatter::default().format(&result);
        assert_eq!(message.classification, Classification::NormalRange);
        assert_eq!(message.classification.label(), "normal range");
    }

    #[test]
    fn test_far_above_sd3_is_above_normal_range() {
        let formatter = ReportFormatter::default();

        let weight = resolver()
            .resolve(&query(MetricKind::Weight, Sex::Female, 5.0, 70.0))
            .unwrap();
        assert_eq!(weight.band, SdBand::AboveSd3);
        assert!(weight.z_score > 3.0);
        assert_eq!(formatter.format(&weight).classification, Classification::AboveNormalRange);

        let height = resolver()
            .resolve(&query(MetricKind::Height, Sex::Female, 5.0, 70.0))
            .unwrap();
        assert!(height.z_score > 2.0);
        assert_eq!(height.band, SdBand::Sd2ToSd3);
        assert_eq!(formatter.format(&height).classification, Classification::AboveNormalRange);
    }

    #[test]
    fn test_unknown_partition() {
        let err = resolver()
            .resolve(&query(MetricKind::HeadCircumference, Sex::Male, 0.0, 34.0))
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnknownPartition {
                metric: MetricKind::HeadCircumference,
                sex: Sex::Male
            }
        );

        // clamping does not hide a missing partition
        assert!(matches!(
            resolver().resolve_clamped(&query(MetricKind::HeadCircumference, Sex::Male, 20.0, 34.0)),
            Err(Error::UnknownPartition { .. })
        ));
    }

    #[test]
    fn test_invalid_input_rejected_before_lookup() {
        let resolver = resolver();
        let cases = [
            query(MetricKind::Weight, Sex::Female, 3.0, 0.0),
            query(MetricKind::Weight, Sex::Female, 3.0, -4.2),
            query(MetricKind::Weight, Sex::Female, 3.0, f64::NAN),
            query(MetricKind::Weight, Sex::Female, -1.0, 5.0),
            query(MetricKind::Weight, Sex::Female, f64::INFINITY, 5.0),
            // invalid input wins over the missing partition
            query(MetricKind::HeadCircumference, Sex::Male, -1.0, 34.0),
        ];

        for case in cases {
            assert!(
                matches!(resolver.resolve(&case), Err(Error::InvalidInput(_))),
                "Expected InvalidInput for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_resolve_at_bounds() {
        let resolver = resolver();
        let hc = MetricKind::HeadCircumference;

        let last = resolver.resolve(&query(hc, Sex::Female, 13.0, 40.0)).unwrap();
        match last.source {
            LmsSource::Exact(record) => assert_eq!(record.age_index, 13),
            other => panic!("Expected exact source, got {:?}", other),
        }

        assert!(matches!(
            resolver.resolve(&query(hc, Sex::Female, 14.0, 40.0)),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(
            resolver.resolve(&query(MetricKind::Weight, Sex::Male, 12.5, 9.0)),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_clamp_substitutes_nearest_bound() {
        let resolver = resolver();
        let late = query(MetricKind::HeadCircumference, Sex::Female, 20.0, 40.0);

        assert!(matches!(resolver.resolve(&late), Err(Error::OutOfRange { .. })));

        let clamped = resolver.resolve_clamped(&late).unwrap();
        assert!(clamped.approximate);
        assert_eq!(clamped.query.age, 20.0);
        match clamped.source {
            LmsSource::Exact(record) => assert_eq!(record.age_index, 13),
            other => panic!("Expected exact source, got {:?}", other),
        }

        let in_range = resolver
            .resolve_clamped(&query(MetricKind::HeadCircumference, Sex::Female, 5.0, 37.0))
            .unwrap();
        assert!(!in_range.approximate);

        let message = ReportFormatter::default().format(&clamped);
        assert!(message.approximate);
        assert!(message.text.contains("Approximate"));
    }

    #[test]
    fn test_interpolation_midpoint() {
        let result = resolver()
            .resolve(&query(MetricKind::Weight, Sex::Female, 2.5, 5.5))
            .unwrap();

        let (lower, upper, fraction) = match result.source {
            LmsSource::Interpolated { lower, upper, fraction } => (lower, upper, fraction),
            other => panic!("Expected interpolated source, got {:?}", other),
        };
        assert_eq!(lower.age_index, 2);
        assert_eq!(upper.age_index, 3);
        assert!((fraction - 0.5).abs() < 1e-12);

        assert!((result.lms.m - (lower.m + upper.m) / 2.0).abs() < 1e-12);
        assert!((result.lms.l - (lower.l + upper.l) / 2.0).abs() < 1e-12);
        assert!((result.lms.s - (lower.s + upper.s) / 2.0).abs() < 1e-12);

        for idx in 0..7 {
            let expected = (lower.sd.points[idx] + upper.sd.points[idx]) / 2.0;
            assert!((result.sd_reference.points[idx] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_z_score_monotonic_in_value() {
        let resolver = resolver();
        let mut rng = thread_rng();
        let ages = Uniform::new(0.0, 12.0);

        for metric in [MetricKind::Weight, MetricKind::Height] {
            for sex in Sex::ALL {
                for _ in 0..50 {
                    let age = ages.sample(&mut rng);
                    let median = resolver.value_for_z(metric, sex, age, 0.0).unwrap();
                    let mut values: Vec<f64> = (0..20)
                        .map(|_| rng.gen_range(0.3 * median..2.0 * median))
                        .collect();
                    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
                    values.dedup();

                    let scores: Vec<f64> = values
                        .iter()
                        .map(|&v| resolver.resolve(&query(metric, sex, age, v)).unwrap().z_score)
                        .collect();

                    for pair in scores.windows(2) {
                        assert!(
                            pair[1] > pair[0],
                            "z not increasing for {}/{} at age {}: {:?}",
                            metric, sex, age, pair
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_resolve_idempotent() {
        let resolver = resolver();
        let q = query(MetricKind::Height, Sex::Male, 7.3, 70.1);
        let first = resolver.resolve(&q).unwrap();
        let second = resolver.resolve(&q).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_inverse_transform_round_trip() {
        let resolver = resolver();
        let mut rng = thread_rng();
        let normal = Normal::new(0.0, 1.0).unwrap();

        for (metric, sex, records) in REFERENCE_TABLE.partitions() {
            let last = records.last().unwrap().age_index;
            for record in records {
                let mut ages = vec![record.age_index as f64];
                if record.age_index < last {
                    ages.push(record.age_index as f64 + 0.5);
                }

                for age in ages {
                    for _ in 0..10 {
                        let z: f64 = normal.sample(&mut rng);
                        let z = z.clamp(-3.0, 3.0);
                        let value = resolver.value_for_z(metric, sex, age, z).unwrap();
                        let back = resolver.resolve(&query(metric, sex, age, value)).unwrap();
                        assert!(
                            (back.z_score - z).abs() < ROUND_TRIP_TOL,
                            "{}/{} age {}: z {} came back as {}",
                            metric, sex, age, z, back.z_score
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_log_form_when_l_is_zero() {
        let lms = Lms::new(0.0, 10.0, 0.1);
        let value = 10.0 * (0.1f64).exp();
        assert!((lms.z_score(value) - 1.0).abs() < 1e-12);
        assert!((lms.value_at_z(1.0).unwrap() - value).abs() < 1e-12);
        assert!((lms.z_score(10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_transform_without_solution() {
        // 1 + L*S*z <= 0
        let lms = Lms::new(2.0, 10.0, 0.2);
        assert_eq!(lms.value_at_z(-3.0), None);

        let reference = lms.sd_reference();
        assert_eq!(reference.points[0], 0.0);
        assert!(reference.points.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_value_for_z_median() {
        let resolver = resolver();
        let value = resolver.value_for_z(MetricKind::Weight, Sex::Male, 6.0, 0.0).unwrap();
        assert!((value - 7.9340).abs() < 1e-12);

        assert!(matches!(
            resolver.value_for_z(MetricKind::Weight, Sex::Male, 6.0, f64::NAN),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_batch_keeps_order() {
        let queries = [
            query(MetricKind::Weight, Sex::Female, 3.0, 5.8458),
            query(MetricKind::HeadCircumference, Sex::Male, 0.0, 34.0),
            query(MetricKind::HeadCircumference, Sex::Female, 30.0, 40.0),
        ];

        let strict = resolver().resolve_batch(&queries, false);
        assert_eq!(strict.len(), 3);
        assert!(strict[0].is_ok());
        assert!(matches!(strict[1], Err(Error::UnknownPartition { .. })));
        assert!(matches!(strict[2], Err(Error::OutOfRange { .. })));

        let clamped = resolver().resolve_batch(&queries, true);
        assert!(clamped[2].as_ref().unwrap().approximate);
    }

    // --- SD band tests ---
    #[test]
    fn test_sd_band_edges() {
        let reference = SdReference::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(SdBand::classify(0.5, &reference), SdBand::BelowSd3Neg);
        assert_eq!(SdBand::classify(1.0, &reference), SdBand::Sd3NegToSd2Neg);
        assert_eq!(SdBand::classify(3.5, &reference), SdBand::Sd1NegToSd0);
        assert_eq!(SdBand::classify(4.0, &reference), SdBand::Sd0ToSd1);
        assert_eq!(SdBand::classify(6.9, &reference), SdBand::Sd2ToSd3);
        assert_eq!(SdBand::classify(7.0, &reference), SdBand::AboveSd3);
        assert_eq!(SdBand::Sd1ToSd2.to_string(), "between SD1 and SD2");
        assert_eq!(reference.at_level(-2), Some(2.0));
        assert_eq!(reference.at_level(4), None);
    }

    #[test]
    fn test_band_agrees_with_z_at_tabulated_ages() {
        let resolver = resolver();
        for (z, band) in [
            (-2.5, SdBand::Sd3NegToSd2Neg),
            (-0.5, SdBand::Sd1NegToSd0),
            (1.5, SdBand::Sd1ToSd2),
            (3.5, SdBand::AboveSd3),
        ] {
            let value = resolver.value_for_z(MetricKind::Weight, Sex::Female, 8.0, z).unwrap();
            let result = resolver.resolve(&query(MetricKind::Weight, Sex::Female, 8.0, value)).unwrap();
            assert_eq!(result.band, band, "z = {}", z);
        }
    }

    // --- Formatter and config tests ---
    #[test]
    fn test_formatter_thresholds_per_metric() {
        let result = resolver()
            .resolve(&query(MetricKind::Height, Sex::Female, 5.0, 70.0))
            .unwrap();

        let strict = ReportFormatter::default().format(&result);
        assert_eq!(strict.classification, Classification::AboveNormalRange);
        assert!(strict.text.contains("pediatrician"));

        let relaxed = ClassificationThresholds::default()
            .with_metric(MetricKind::Height, MetricThresholds::new(-3.0, 3.0).unwrap());
        let message = ReportFormatter::new(relaxed).format(&result);
        assert_eq!(message.classification, Classification::NormalRange);
        assert!(!message.text.contains("pediatrician"));
    }

    #[test]
    fn test_formatter_below_normal_range() {
        let resolver = resolver();
        let value = resolver.value_for_z(MetricKind::Weight, Sex::Male, 4.0, -2.5).unwrap();
        let result = resolver.resolve(&query(MetricKind::Weight, Sex::Male, 4.0, value)).unwrap();
        let message = ReportFormatter::default().format(&result);
        assert_eq!(message.classification, Classification::BelowNormalRange);
        assert_eq!(message.band, Some(SdBand::Sd3NegToSd2Neg));
    }

    #[test]
    fn test_formatter_threshold_is_inclusive() {
        let resolver = resolver();
        let value = resolver.value_for_z(MetricKind::Height, Sex::Male, 2.0, 2.0).unwrap();
        let mut result = resolver.resolve(&query(MetricKind::Height, Sex::Male, 2.0, value)).unwrap();
        result.z_score = 2.0;
        assert_eq!(
            ReportFormatter::default().classify(&result),
            Classification::NormalRange
        );
    }

    #[test]
    fn test_format_outcome_degrades_to_undetermined() {
        let formatter = ReportFormatter::default();
        let outcome = resolver().resolve(&query(MetricKind::HeadCircumference, Sex::Male, 0.0, 34.0));
        let message = formatter.format_outcome(&outcome);
        assert_eq!(message.classification, Classification::Undetermined);
        assert_eq!(message.classification.label(), "undetermined");
        assert_eq!(message.z_score, None);

        let ok = resolver().resolve(&query(MetricKind::HeadCircumference, Sex::Female, 0.0, 33.8787));
        assert_eq!(formatter.format_outcome(&ok).classification, Classification::NormalRange);
    }

    #[test]
    fn test_metric_thresholds_validation() {
        assert!(matches!(MetricThresholds::new(2.0, -2.0), Err(Error::Config(_))));
        assert!(matches!(MetricThresholds::new(1.0, 1.0), Err(Error::Config(_))));
        assert!(MetricThresholds::new(-1.5, 1.5).is_ok());
    }

    #[test]
    fn test_thresholds_from_env() {
        std::env::set_var("GROWTH_HEAD_CIRCUMFERENCE_UPPER_Z", "2.5");
        let thresholds = ClassificationThresholds::from_env().unwrap();
        assert_eq!(thresholds.head_circumference.upper_z, 2.5);
        assert_eq!(thresholds.head_circumference.lower_z, DEFAULT_LOWER_Z);

        std::env::set_var("GROWTH_HEAD_CIRCUMFERENCE_UPPER_Z", "wide");
        assert!(matches!(ClassificationThresholds::from_env(), Err(Error::Config(_))));

        std::env::set_var("GROWTH_HEAD_CIRCUMFERENCE_UPPER_Z", "-2.5");
        assert!(matches!(ClassificationThresholds::from_env(), Err(Error::Config(_))));

        std::env::remove_var("GROWTH_HEAD_CIRCUMFERENCE_UPPER_Z");
    }

    // --- Model parsing tests ---
    #[test]
    fn test_sex_and_metric_parsing() {
        assert_eq!("girl".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("Boy".parse::<Sex>().unwrap(), Sex::Male);
        assert!(matches!("other".parse::<Sex>(), Err(Error::InvalidInput(_))));

        for metric in MetricKind::ALL {
            assert_eq!(metric.to_string().parse::<MetricKind>().unwrap(), metric);
        }
        assert_eq!("head_circumference".parse::<MetricKind>().unwrap(), MetricKind::HeadCircumference);
        assert_eq!(MetricKind::HeadCircumference.age_unit(), AgeUnit::Week);
        assert_eq!(MetricKind::Weight.age_unit(), AgeUnit::Month);
    }

    #[test]
    fn test_query_json_aliases() {
        let parsed: MeasurementQuery = serde_json::from_str(
            r#"{"metric":"head-circumference","sex":"girl","age":0,"value":33.8787}"#,
        )
        .unwrap();
        assert_eq!(parsed.metric, MetricKind::HeadCircumference);
        assert_eq!(parsed.sex, Sex::Female);

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["sex"], "female");
    }

    // --- Validator tests ---
    #[test]
    fn test_embedded_tables_validate_clean() {
        let results = TableValidator::new(&REFERENCE_TABLE).validate_all();
        assert_eq!(results.len(), 5);
        for (key, stats) in results {
            assert!(stats.is_clean(), "{} has discrepancies: {:?}", key, stats.discrepancies);
            assert!(!stats.is_significant());
            assert_eq!(stats.points_checked, stats.records_checked * 7);
        }
    }

    #[test]
    fn test_validator_flags_drifted_sd_point() {
        let mut drifted = record(0, Sex::Male, 50.0);
        drifted.sd.points[6] += 2.0;
        let stats = validate_partition(&[drifted, record(1, Sex::Male, 52.0)]);

        assert_eq!(stats.discrepancies.len(), 1);
        assert_eq!(stats.discrepancies[0].level, 3);
        assert!(stats.is_significant());
    }

    // --- API handler tests ---
    #[tokio::test]
    async fn test_percentile_handler() {
        let params = PercentileQuery {
            metric: MetricKind::HeadCircumference,
            sex: Sex::Female,
            age: 0.0,
            value: 33.8787,
            clamp: None,
            lenient: None,
        };
        let response = get_percentile(State(app_state()), Query(params)).await.unwrap().0;

        assert_eq!(response.message.classification, Classification::NormalRange);
        assert!(response.result.unwrap().z_score.abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_percentile_handler_error_statuses() {
        let base = |metric: MetricKind, sex: Sex, age: f64, value: f64| PercentileQuery {
            metric,
            sex,
            age,
            value,
            clamp: None,
            lenient: None,
        };

        let missing = get_percentile(
            State(app_state()),
            Query(base(MetricKind::HeadCircumference, Sex::Male, 0.0, 34.0)),
        )
        .await;
        assert_eq!(missing.unwrap_err(), StatusCode::NOT_FOUND);

        let out_of_range = get_percentile(
            State(app_state()),
            Query(base(MetricKind::Weight, Sex::Female, 30.0, 9.0)),
        )
        .await;
        assert_eq!(out_of_range.unwrap_err(), StatusCode::UNPROCESSABLE_ENTITY);

        let invalid = get_percentile(
            State(app_state()),
            Query(base(MetricKind::Weight, Sex::Female, 3.0, -1.0)),
        )
        .await;
        assert_eq!(invalid.unwrap_err(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_percentile_handler_lenient_and_clamp() {
        let lenient = PercentileQuery {
            metric: MetricKind::HeadCircumference,
            sex: Sex::Male,
            age: 0.0,
            value: 34.0,
            clamp: None,
            lenient: Some(true),
        };
        let response = get_percentile(State(app_state()), Query(lenient)).await.unwrap().0;
        assert!(response.result.is_none());
        assert_eq!(response.message.classification, Classification::Undetermined);

        let clamped = PercentileQuery {
            metric: MetricKind::Weight,
            sex: Sex::Female,
            age: 30.0,
            value: 9.0,
            clamp: Some(true),
            lenient: None,
        };
        let response = get_percentile(State(app_state()), Query(clamped)).await.unwrap().0;
        assert!(response.result.unwrap().approximate);
        assert!(response.message.approximate);
    }

    #[tokio::test]
    async fn test_reference_table_handler() {
        let params = TableQuery {
            metric: MetricKind::HeadCircumference,
            sex: Sex::Female,
        };
        let response = get_reference_table(State(app_state()), Query(params)).await.unwrap().0;
        assert_eq!(response.records.len(), 14);
        assert_eq!(response.age_unit, AgeUnit::Week);
        assert_eq!(response.records[0].m, 33.8787);

        let missing = TableQuery {
            metric: MetricKind::HeadCircumference,
            sex: Sex::Male,
        };
        let status = get_reference_table(State(app_state()), Query(missing)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // --- Writer tests ---
    async fn read_rows(store: &Arc<dyn ObjectStore>, path: &object_store::path::Path) -> usize {
        let bytes = store.get(path).await.unwrap().bytes().await.unwrap();
        ParquetRecordBatchReader::try_new(bytes, 1024)
            .unwrap()
            .map(|batch| batch.unwrap().num_rows())
            .sum()
    }

    #[tokio::test]
    async fn test_export_reference_charts() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let writer = ParquetChartWriter::new(Arc::clone(&store));

        let written = writer.write_reference_charts(&REFERENCE_TABLE).await.unwrap();
        assert_eq!(written, 5);

        let path = ParquetChartWriter::chart_path(MetricKind::HeadCircumference, Sex::Female);
        assert_eq!(path.to_string(), "charts/head-circumference_female.parquet");
        assert_eq!(read_rows(&store, &path).await, 14);

        let weight = ParquetChartWriter::chart_path(MetricKind::Weight, Sex::Male);
        assert_eq!(read_rows(&store, &weight).await, 13);
    }

    #[tokio::test]
    async fn test_persist_measurement_history() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let writer = ParquetChartWriter::new(Arc::clone(&store));

        let results: Vec<PercentileResult> = [
            query(MetricKind::Weight, Sex::Female, 2.0, 5.0),
            query(MetricKind::Height, Sex::Male, 3.5, 62.0),
            query(MetricKind::HeadCircumference, Sex::Female, 6.0, 37.5),
        ]
        .iter()
        .map(|q| resolver().resolve(q).unwrap())
        .collect();

        writer.persist(&results).await.unwrap();
        assert_eq!(read_rows(&store, &ParquetChartWriter::history_path()).await, 3);

        // empty input leaves the store untouched
        let empty_store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        ParquetChartWriter::new(Arc::clone(&empty_store)).persist(&[]).await.unwrap();
        assert!(empty_store.get(&ParquetChartWriter::history_path()).await.is_err());
    }

    #[tokio::test]
    async fn test_persist_appends_to_history() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let writer = ParquetChartWriter::new(Arc::clone(&store));
        let history = ParquetChartWriter::history_path();

        let first = resolver()
            .resolve(&query(MetricKind::Weight, Sex::Female, 1.0, 4.2))
            .unwrap();
        let second = resolver()
            .resolve(&query(MetricKind::Height, Sex::Male, 7.5, 69.0))
            .unwrap();

        writer.persist(&[first]).await.unwrap();
        assert_eq!(read_rows(&store, &history).await, 1);

        writer.persist(&[second]).await.unwrap();
        assert_eq!(read_rows(&store, &history).await, 2, "Earlier measurements must survive a second write");

        // a fresh writer on the same store keeps appending
        ParquetChartWriter::new(Arc::clone(&store))
            .persist(&[first, second])
            .await
            .unwrap();
        assert_eq!(read_rows(&store, &history).await, 4);

        let bytes = store.get(&history).await.unwrap().bytes().await.unwrap();
        let metrics: Vec<String> = ParquetRecordBatchReader::try_new(bytes, 1024)
            .unwrap()
            .flat_map(|batch| {
                let batch = batch.unwrap();
                batch
                    .column_by_name("metric")
                    .unwrap()
                    .as_string::<i32>()
                    .iter()
                    .map(|m| m.unwrap().to_string())
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(metrics, vec!["weight", "height", "weight", "height"]);
    }

    #[tokio::test]
    async fn test_writer_zero_attempts_still_writes_once() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let writer = ParquetChartWriter::new(Arc::clone(&store)).with_max_attempts(0);

        let result = resolver()
            .resolve(&query(MetricKind::Weight, Sex::Male, 3.0, 6.4))
            .unwrap();
        writer.persist(&[result]).await.unwrap();
        assert_eq!(read_rows(&store, &ParquetChartWriter::history_path()).await, 1);

        let written = writer.write_reference_charts(&REFERENCE_TABLE).await.unwrap();
        assert_eq!(written, 5);
    }
}
