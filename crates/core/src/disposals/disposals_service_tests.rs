#[cfg(test)]
mod tests {
    use crate::disposals::{
        summarize_disposals, DisposalField, DisposalFieldUpdate, DisposalMutation, DisposalRecord,
        DisposalService, DisposalServiceTrait, DisposalState, DisposalStoreTrait, DisposalSummary,
        FieldValue,
    };
    use crate::errors::{Error, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    // --- Mock DisposalStore ---
    #[derive(Default)]
    struct MockDisposalStore {
        records: Mutex<Vec<DisposalRecord>>,
        gain_total: Mutex<Option<f64>>,
        carry_in_fraction: Mutex<f64>,
    }

    impl MockDisposalStore {
        fn with_records(records: Vec<DisposalRecord>) -> Self {
            MockDisposalStore {
                records: Mutex::new(records),
                ..Default::default()
            }
        }

        fn stored_records(&self) -> Vec<DisposalRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DisposalStoreTrait for MockDisposalStore {
        fn load_disposals(&self) -> Result<Vec<DisposalRecord>> {
            Ok(self.stored_records())
        }

        async fn save_disposals(&self, records: Vec<DisposalRecord>) -> Result<()> {
            *self.records.lock().unwrap() = records;
            Ok(())
        }

        async fn mutate_disposals(&self, mutation: DisposalMutation) -> Result<DisposalSummary> {
            let mut records = self.records.lock().unwrap();
            let mut carry_in_fraction = self.carry_in_fraction.lock().unwrap();
            let mut gain_total = self.gain_total.lock().unwrap();

            let mut state = DisposalState {
                records: records.clone(),
                carry_in_fraction: *carry_in_fraction,
            };
            mutation(&mut state)?;

            let summary = summarize_disposals(&state.records, state.carry_in_fraction);
            *records = state.records;
            *carry_in_fraction = state.carry_in_fraction;
            *gain_total = Some(summary.total_gain_or_loss);
            Ok(summary)
        }

        fn load_gain_total(&self) -> Result<Option<f64>> {
            Ok(*self.gain_total.lock().unwrap())
        }

        async fn save_gain_total(&self, total: f64) -> Result<()> {
            *self.gain_total.lock().unwrap() = Some(total);
            Ok(())
        }

        fn load_carry_in_fraction(&self) -> Result<f64> {
            Ok(*self.carry_in_fraction.lock().unwrap())
        }

        async fn save_carry_in_fraction(&self, value: f64) -> Result<()> {
            *self.carry_in_fraction.lock().unwrap() = value;
            Ok(())
        }
    }

    fn disposal(day: u32, portfolio: f64, amount: f64, acquisition: f64) -> DisposalRecord {
        DisposalRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
            total_portfolio_value: portfolio,
            disposal_amount: amount,
            disposal_fees: 0.0,
            balancing_payment: 0.0,
            total_acquisition_cost: acquisition,
            prior_balancing_payment_received: 0.0,
        }
    }

    fn setup(records: Vec<DisposalRecord>) -> (DisposalService, Arc<MockDisposalStore>) {
        let store = Arc::new(MockDisposalStore::with_records(records));
        (DisposalService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_empty_store_summary() {
        let (service, _) = setup(Vec::new());
        let summary = service.get_summary().unwrap();
        assert!(summary.disposals.is_empty());
        assert_eq!(summary.total_gain_or_loss, 0.0);
        assert_eq!(summary.estimated_tax, 0.0);
    }

    #[tokio::test]
    async fn test_add_disposal_appends_and_persists_total() {
        let (service, store) = setup(Vec::new());

        let mut first = disposal(1, 10000.0, 1000.0, 5000.0);
        first.disposal_fees = 10.0;
        let summary = service.add_disposal(first.clone()).await.unwrap();

        assert_eq!(store.stored_records(), vec![first]);
        assert_eq!(summary.disposals.len(), 1);
        assert!((summary.total_gain_or_loss - 490.0).abs() < 1e-9);
        assert!((summary.estimated_tax - 147.0).abs() < 1e-9);
        assert_eq!(
            store.load_gain_total().unwrap(),
            Some(summary.total_gain_or_loss)
        );

        let second = disposal(2, 8000.0, 2000.0, 5000.0);
        service.add_disposal(second.clone()).await.unwrap();
        assert_eq!(store.stored_records()[1], second);
    }

    #[tokio::test]
    async fn test_carry_in_fraction_is_used_for_first_row() {
        let (service, store) = setup(vec![disposal(1, 10000.0, 1000.0, 5000.0)]);
        assert_eq!(service.get_carry_in_fraction().unwrap(), 0.0);

        let summary = service.set_carry_in_fraction(250.0).await.unwrap();
        assert_eq!(store.load_carry_in_fraction().unwrap(), 250.0);
        assert_eq!(summary.carry_in_fraction, 250.0);
        assert_eq!(summary.disposals[0].capital_fraction, 250.0);
        assert_eq!(
            store.load_gain_total().unwrap(),
            Some(summary.total_gain_or_loss)
        );
    }

    #[tokio::test]
    async fn test_update_field_recomputes_following_rows() {
        let (service, store) = setup(vec![
            disposal(1, 10000.0, 1000.0, 5000.0),
            disposal(2, 8000.0, 2000.0, 5000.0),
        ]);
        let before = service.get_summary().unwrap();

        let after = service
            .update_disposal_field(
                0,
                DisposalFieldUpdate {
                    field: DisposalField::DisposalAmount,
                    value: FieldValue::Text("2000".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(store.stored_records()[0].disposal_amount, 2000.0);
        assert_eq!(store.stored_records()[1], disposal(2, 8000.0, 2000.0, 5000.0));
        assert_ne!(
            before.disposals[1].capital_fraction,
            after.disposals[1].capital_fraction
        );
        assert!((after.disposals[1].capital_fraction - 1000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_update_out_of_range_is_rejected() {
        let (service, store) = setup(vec![disposal(1, 10000.0, 1000.0, 5000.0)]);

        let result = service
            .update_disposal_field(
                3,
                DisposalFieldUpdate {
                    field: DisposalField::DisposalFees,
                    value: FieldValue::Number(1.0),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert_eq!(store.stored_records().len(), 1);
        assert_eq!(store.load_gain_total().unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_keeps_other_raw_records_and_rechains() {
        let records = vec![
            disposal(1, 10000.0, 1000.0, 5000.0),
            disposal(2, 8000.0, 2000.0, 5000.0),
            disposal(3, 6000.0, 600.0, 5500.0),
        ];
        let (service, store) = setup(records.clone());
        let before = service.get_summary().unwrap();

        let after = service.delete_disposal(1).await.unwrap();

        assert_eq!(
            store.stored_records(),
            vec![records[0].clone(), records[2].clone()]
        );
        assert_eq!(after.disposals[0], before.disposals[0]);
        // The third record now chains on the first one.
        assert!((after.disposals[1].capital_fraction - 550.0).abs() < 1e-9);
        assert_ne!(after.disposals[1], before.disposals[2]);
        assert_ne!(after.total_gain_or_loss, before.total_gain_or_loss);
    }

    #[tokio::test]
    async fn test_delete_out_of_range_is_rejected() {
        let (service, store) = setup(Vec::new());
        let result = service.delete_disposal(0).await;
        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(store.stored_records().is_empty());
    }

    #[tokio::test]
    async fn test_replace_disposals() {
        let (service, store) = setup(vec![disposal(1, 10000.0, 1000.0, 5000.0)]);
        let replacement = vec![
            disposal(4, 9000.0, 900.0, 3000.0),
            disposal(5, 9500.0, 950.0, 3000.0),
        ];

        let summary = service.replace_disposals(replacement.clone()).await.unwrap();

        assert_eq!(store.stored_records(), replacement);
        assert_eq!(summary.disposals.len(), 2);
        assert_eq!(
            store.load_gain_total().unwrap(),
            Some(summary.total_gain_or_loss)
        );
    }

    #[tokio::test]
    async fn test_concurrent_mutations_leave_total_in_step_with_records() {
        let (service, store) = setup(Vec::new());
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for day in 1..=16 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .add_disposal(disposal(day, 1000.0 * day as f64, 100.0, 400.0))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = store.stored_records();
        assert_eq!(stored.len(), 16);
        let expected = summarize_disposals(&stored, 0.0).total_gain_or_loss;
        assert_eq!(store.load_gain_total().unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_previous_total() {
        let (service, store) = setup(vec![disposal(1, 10000.0, 1000.0, 5000.0)]);
        let summary = service.set_carry_in_fraction(100.0).await.unwrap();

        let result = service.delete_disposal(7).await;

        assert!(result.is_err());
        assert_eq!(
            store.load_gain_total().unwrap(),
            Some(summary.total_gain_or_loss)
        );
        assert_eq!(store.load_carry_in_fraction().unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_report_matches_summary() {
        let (service, _) = setup(vec![disposal(1, 10000.0, 1000.0, 5000.0)]);
        let report = service.get_report().unwrap();
        assert_eq!(report.columns, vec!["Cession 1".to_string()]);
        assert_eq!(report.total_gain_or_loss, "500.00 €");
        assert_eq!(report.estimated_tax, "150.00 €");
    }
}
