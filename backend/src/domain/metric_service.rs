use shared::classify::{calculate_trend, comparable_value};
use shared::{CreateHealthMetric, HealthMetric, MetricKind, Resource, Validate};
use tracing::info;

use crate::domain::{new_meta, RecordService};
use crate::error::ServiceResult;
use crate::storage::DbConnection;

/// Health metric creation. Reads, patches and deletes go through the
/// generic [`RecordService`].
#[derive(Clone)]
pub struct MetricService {
    records: RecordService<HealthMetric>,
}

impl MetricService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            records: RecordService::new(db),
        }
    }

    /// Classifies the reading and sets the trend against the user's latest
    /// metric of the same kind. Custom metrics only follow earlier readings
    /// with the same title and unit.
    pub async fn create_metric(
        &self,
        user_id: &str,
        input: &CreateHealthMetric,
    ) -> ServiceResult<HealthMetric> {
        input.validate()?;
        let mut metric = HealthMetric::build(new_meta(user_id), input);

        let mut filters = vec![("kind", metric.kind.as_str())];
        if metric.kind == MetricKind::Custom {
            filters.push(("title", metric.title.as_str()));
            filters.push(("unit", metric.unit.as_str()));
        }
        let previous = self
            .records
            .repository()
            .latest_where(user_id, &filters)
            .await?;
        metric.trend = calculate_trend(
            previous
                .as_ref()
                .map(|p| comparable_value(p.kind, p.value, &p.unit)),
            comparable_value(metric.kind, metric.value, &metric.unit),
        );

        info!(
            "New {} reading for user {}: {} {} ({}, trend {})",
            metric.kind,
            user_id,
            metric.display_value(),
            metric.unit,
            metric.category,
            metric.trend
        );

        self.records.insert(metric).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::seed_user;
    use shared::{HeightUnit, MetricKind, MetricReading, Trend, WeightUnit};

    async fn setup() -> MetricService {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        seed_user(&db, "user-1").await;
        MetricService::new(db)
    }

    fn weight(value: f64) -> CreateHealthMetric {
        CreateHealthMetric {
            title: None,
            reading: MetricReading::Weight {
                value,
                unit: WeightUnit::Kg,
            },
            notes: None,
            recorded_at: None,
        }
    }

    #[tokio::test]
    async fn test_bmi_reading_is_classified() {
        let service = setup().await;
        let metric = service
            .create_metric(
                "user-1",
                &CreateHealthMetric {
                    title: None,
                    reading: MetricReading::Bmi {
                        weight: 62.0,
                        height: 165.0,
                        weight_unit: WeightUnit::Kg,
                        height_unit: HeightUnit::Cm,
                    },
                    notes: None,
                    recorded_at: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(metric.kind, MetricKind::Bmi);
        assert_eq!(metric.value, 22.8);
        assert_eq!(metric.category, "Healthy");
        assert_eq!(metric.trend, Trend::Stable);
    }

    #[tokio::test]
    async fn test_trend_follows_previous_reading_of_same_kind() {
        let service = setup().await;

        let first = service.create_metric("user-1", &weight(60.0)).await.unwrap();
        assert_eq!(first.trend, Trend::Stable);

        let second = service.create_metric("user-1", &weight(63.0)).await.unwrap();
        assert_eq!(second.trend, Trend::Up);

        let third = service.create_metric("user-1", &weight(63.2)).await.unwrap();
        assert_eq!(third.trend, Trend::Stable);

        let fourth = service.create_metric("user-1", &weight(59.0)).await.unwrap();
        assert_eq!(fourth.trend, Trend::Down);
    }

    fn custom(title: &str, value: f64, unit: &str) -> CreateHealthMetric {
        CreateHealthMetric {
            title: None,
            reading: MetricReading::Custom {
                title: title.to_string(),
                value,
                unit: unit.to_string(),
            },
            notes: None,
            recorded_at: None,
        }
    }

    fn weight_at(value: f64, recorded_at: &str) -> CreateHealthMetric {
        CreateHealthMetric {
            recorded_at: Some(recorded_at.to_string()),
            ..weight(value)
        }
    }

    #[tokio::test]
    async fn test_weight_in_pounds_compares_with_kilograms() {
        let service = setup().await;
        service.create_metric("user-1", &weight(60.0)).await.unwrap();

        let pounds = service
            .create_metric(
                "user-1",
                &CreateHealthMetric {
                    title: None,
                    reading: MetricReading::Weight {
                        value: 132.3,
                        unit: WeightUnit::Lb,
                    },
                    notes: None,
                    recorded_at: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(pounds.value, 132.3);
        assert_eq!(pounds.unit, "lb");
        assert_eq!(pounds.trend, Trend::Stable);
    }

    #[tokio::test]
    async fn test_custom_trend_follows_same_title_and_unit() {
        let service = setup().await;
        service.create_metric("user-1", &custom("Water", 2.5, "L")).await.unwrap();

        let steps = service.create_metric("user-1", &custom("Steps", 8000.0, "steps")).await.unwrap();
        assert_eq!(steps.trend, Trend::Stable);

        let water = service.create_metric("user-1", &custom("Water", 2.0, "L")).await.unwrap();
        assert_eq!(water.trend, Trend::Down);
    }

    #[tokio::test]
    async fn test_mixed_offsets_order_by_instant() {
        let service = setup().await;
        // 08:00+08:00 is 00:00Z, the earliest of the three.
        service
            .create_metric("user-1", &weight_at(70.0, "2025-05-01T08:00:00+08:00"))
            .await
            .unwrap();
        service
            .create_metric("user-1", &weight_at(60.0, "2025-05-01T06:00:00Z"))
            .await
            .unwrap();
        let latest = service
            .create_metric("user-1", &weight_at(70.0, "2025-05-01T12:00:00Z"))
            .await
            .unwrap();
        assert_eq!(latest.trend, Trend::Up);

        let listed: Vec<(String, f64)> = service
            .records
            .list("user-1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| (m.recorded_at, m.value))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("2025-05-01T12:00:00.000000Z".to_string(), 70.0),
                ("2025-05-01T06:00:00.000000Z".to_string(), 60.0),
                ("2025-05-01T00:00:00.000000Z".to_string(), 70.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_trend_ignores_other_kinds() {
        let service = setup().await;
        service
            .create_metric(
                "user-1",
                &CreateHealthMetric {
                    title: None,
                    reading: MetricReading::HeartRate { bpm: 150.0 },
                    notes: None,
                    recorded_at: None,
                },
            )
            .await
            .unwrap();

        let metric = service.create_metric("user-1", &weight(60.0)).await.unwrap();
        assert_eq!(metric.trend, Trend::Stable);
    }
}
