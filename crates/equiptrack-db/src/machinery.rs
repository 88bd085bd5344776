use crate::{
    models::{self, AlertLevel},
    schema, Error, Store,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// Optional list filters, combined conjunctively on top of the tenant
/// and active-row filters.
#[derive(Debug, Default)]
pub struct MachineryFilter {
    pub machinery_type: Option<models::MachineryType>,
    pub status: Option<models::MachineryStatus>,
    pub needs_maintenance: Option<bool>,
}

/// An asset is overdue once its horometer passes `next_maintenance_hours`
/// by more than this many hours; until then the alert is a warning.
const CRITICAL_OVERDUE_HOURS: f64 = 50.0;

impl Store {
    #[tracing::instrument(skip(self, new_machinery))]
    pub async fn create_machinery(
        &self,
        tenant: &str,
        mut new_machinery: models::NewMachinery,
    ) -> Result<models::Machinery, Error> {
        use schema::equiptrack::machinery;
        new_machinery.id = crate::generate_id("mach");
        new_machinery.tenant_id = tenant.to_owned();
        new_machinery.is_active = true;
        let mut conn = self.connection().await?;
        diesel::insert_into(machinery::table)
            .values(new_machinery)
            .returning(models::Machinery::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(crate::map_unique_violation)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_machinery(
        &self,
        tenant: &str,
        skip: i64,
        limit: i64,
        filter: MachineryFilter,
    ) -> Result<Vec<models::Machinery>, Error> {
        use schema::equiptrack::machinery::dsl::*;
        let mut conn = self.connection().await?;
        let mut query = machinery
            .filter(tenant_id.eq(tenant).and(is_active.eq(true)))
            .select(models::Machinery::as_select())
            .into_boxed();
        if let Some(wanted) = filter.machinery_type {
            query = query.filter(machinery_type.eq(wanted));
        }
        if let Some(wanted) = filter.status {
            query = query.filter(status.eq(wanted));
        }
        match filter.needs_maintenance {
            Some(true) => {
                query = query.filter(
                    next_maintenance_hours
                        .is_not_null()
                        .and(horometer.nullable().ge(next_maintenance_hours)),
                );
            }
            Some(false) => {
                query = query.filter(
                    next_maintenance_hours
                        .is_null()
                        .or(horometer.nullable().lt(next_maintenance_hours)),
                );
            }
            None => {}
        }
        query
            .offset(skip)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_machinery(
        &self,
        tenant: &str,
        machinery_id: &str,
    ) -> Result<Option<models::Machinery>, Error> {
        use schema::equiptrack::machinery::dsl::*;
        let mut conn = self.connection().await?;
        match machinery
            .filter(
                id.eq(machinery_id)
                    .and(tenant_id.eq(tenant))
                    .and(is_active.eq(true)),
            )
            .select(models::Machinery::as_select())
            .first(&mut conn)
            .await
        {
            Ok(found) => Ok(Some(found)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip(self, changes))]
    pub async fn update_machinery(
        &self,
        tenant: &str,
        machinery_id: &str,
        changes: models::MachineryChanges,
    ) -> Result<Option<models::Machinery>, Error> {
        use schema::equiptrack::machinery::dsl::*;
        let mut conn = self.connection().await?;
        match diesel::update(
            machinery.filter(
                id.eq(machinery_id)
                    .and(tenant_id.eq(tenant))
                    .and(is_active.eq(true)),
            ),
        )
        .set(&changes)
        .returning(models::Machinery::as_returning())
        .get_result(&mut conn)
        .await
        {
            Ok(updated) => Ok(Some(updated)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            // An update with every field omitted has nothing to set.
            Err(diesel::result::Error::QueryBuilderError(_)) => {
                self.get_machinery(tenant, machinery_id).await
            }
            Err(err) => Err(crate::map_unique_violation(err)),
        }
    }

    /// Overwrites the horometer with the reported reading and, when the
    /// report names the operator, records them as the current operator.
    #[tracing::instrument(skip(self))]
    pub async fn update_horometer(
        &self,
        tenant: &str,
        machinery_id: &str,
        reading: models::HorometerUpdate,
    ) -> Result<Option<models::Machinery>, Error> {
        use schema::equiptrack::machinery::dsl::*;
        let mut conn = self.connection().await?;
        match diesel::update(
            machinery.filter(
                id.eq(machinery_id)
                    .and(tenant_id.eq(tenant))
                    .and(is_active.eq(true)),
            ),
        )
        .set(&reading)
        .returning(models::Machinery::as_returning())
        .get_result(&mut conn)
        .await
        {
            Ok(updated) => Ok(Some(updated)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Soft delete: the row stays for history but disappears from every
    /// list, lookup, stat, and alert.
    #[tracing::instrument(skip(self))]
    pub async fn delete_machinery(&self, tenant: &str, machinery_id: &str) -> Result<bool, Error> {
        use schema::equiptrack::machinery::dsl::*;
        let mut conn = self.connection().await?;
        let deactivated = diesel::update(
            machinery.filter(
                id.eq(machinery_id)
                    .and(tenant_id.eq(tenant))
                    .and(is_active.eq(true)),
            ),
        )
        .set(is_active.eq(false))
        .execute(&mut conn)
        .await?;
        Ok(deactivated > 0)
    }

    #[tracing::instrument(skip(self))]
    pub async fn machinery_stats(&self, tenant: &str) -> Result<models::MachineryStats, Error> {
        use diesel::dsl::sum;
        use schema::equiptrack::machinery::dsl::*;
        let mut conn = self.connection().await?;
        let total: i64 = machinery
            .filter(tenant_id.eq(tenant).and(is_active.eq(true)))
            .count()
            .get_result(&mut conn)
            .await?;
        let operational: i64 = machinery
            .filter(
                tenant_id
                    .eq(tenant)
                    .and(is_active.eq(true))
                    .and(status.eq(models::MachineryStatus::Operational)),
            )
            .count()
            .get_result(&mut conn)
            .await?;
        let in_maintenance: i64 = machinery
            .filter(
                tenant_id
                    .eq(tenant)
                    .and(is_active.eq(true))
                    .and(status.eq(models::MachineryStatus::InMaintenance)),
            )
            .count()
            .get_result(&mut conn)
            .await?;
        let needs_maintenance: i64 = machinery
            .filter(
                tenant_id
                    .eq(tenant)
                    .and(is_active.eq(true))
                    .and(next_maintenance_hours.is_not_null())
                    .and(horometer.nullable().ge(next_maintenance_hours)),
            )
            .count()
            .get_result(&mut conn)
            .await?;
        let total_hours: f64 = machinery
            .filter(tenant_id.eq(tenant).and(is_active.eq(true)))
            .select(sum(horometer))
            .first::<Option<f64>>(&mut conn)
            .await?
            .unwrap_or(0.0);
        Ok(models::MachineryStats {
            total,
            operational,
            in_maintenance,
            needs_maintenance,
            total_hours,
        })
    }

    /// One alert per active asset that has reached its maintenance
    /// threshold, most overdue first.
    #[tracing::instrument(skip(self))]
    pub async fn maintenance_alerts(
        &self,
        tenant: &str,
    ) -> Result<Vec<models::MaintenanceAlert>, Error> {
        use schema::equiptrack::machinery::dsl::*;
        let mut conn = self.connection().await?;
        let due = machinery
            .filter(
                tenant_id
                    .eq(tenant)
                    .and(is_active.eq(true))
                    .and(next_maintenance_hours.is_not_null())
                    .and(horometer.nullable().ge(next_maintenance_hours)),
            )
            .select(models::Machinery::as_select())
            .load(&mut conn)
            .await?;
        Ok(build_alerts(due))
    }
}

fn alert_for(asset: models::Machinery) -> Option<models::MaintenanceAlert> {
    let threshold = asset.next_maintenance_hours?;
    if asset.horometer < threshold {
        return None;
    }
    let hours_overdue = asset.horometer - threshold;
    Some(models::MaintenanceAlert {
        machinery_id: asset.id,
        machinery_name: asset.name,
        machinery_code: asset.code,
        current_hours: asset.horometer,
        next_maintenance_hours: threshold,
        hours_until_maintenance: -hours_overdue,
        alert_level: if hours_overdue > CRITICAL_OVERDUE_HOURS {
            AlertLevel::Critical
        } else {
            AlertLevel::Warning
        },
    })
}

/// Orders most-overdue first; ties fall back to the machinery id so the
/// output is deterministic.
fn build_alerts(due: Vec<models::Machinery>) -> Vec<models::MaintenanceAlert> {
    let mut alerts: Vec<_> = due.into_iter().filter_map(alert_for).collect();
    alerts.sort_by(|a, b| {
        a.hours_until_maintenance
            .total_cmp(&b.hours_until_maintenance)
            .then_with(|| a.machinery_id.cmp(&b.machinery_id))
    });
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Machinery, MachineryStatus, MachineryType};

    fn asset(machinery_id: &str, horometer: f64, threshold: Option<f64>) -> Machinery {
        Machinery {
            id: machinery_id.to_owned(),
            name: format!("asset {machinery_id}"),
            code: format!("code-{machinery_id}"),
            brand: None,
            model: None,
            serial_number: None,
            year: None,
            machinery_type: MachineryType::Excavator,
            status: MachineryStatus::Operational,
            current_location: None,
            current_project: None,
            horometer,
            odometer: 0.0,
            operator_name: None,
            operator_id: None,
            next_maintenance_hours: threshold,
            maintenance_interval_hours: 250.0,
            last_maintenance_date: None,
            acquisition_cost: 0.0,
            hourly_rate: 0.0,
            fuel_consumption_rate: 0.0,
            capacity: None,
            engine_power: None,
            weight: None,
            plate_number: None,
            is_available: true,
            is_active: true,
            tenant_id: "tenant-fixture".to_owned(),
        }
    }

    #[test]
    fn reaching_the_threshold_is_already_due() {
        let alert = alert_for(asset("mach-a", 250.0, Some(250.0))).expect("should be due");
        assert_eq!(alert.hours_until_maintenance, 0.0);
        assert_eq!(alert.alert_level, AlertLevel::Warning);
    }

    #[test]
    fn below_threshold_or_without_threshold_raises_nothing() {
        assert!(alert_for(asset("mach-a", 249.9, Some(250.0))).is_none());
        assert!(alert_for(asset("mach-b", 10_000.0, None)).is_none());
    }

    #[test]
    fn fifty_hours_overdue_is_still_a_warning() {
        let alert = alert_for(asset("mach-a", 300.0, Some(250.0))).expect("should be due");
        assert_eq!(alert.hours_until_maintenance, -50.0);
        assert_eq!(alert.alert_level, AlertLevel::Warning);
    }

    #[test]
    fn more_than_fifty_hours_overdue_is_critical() {
        let alert = alert_for(asset("mach-a", 300.1, Some(250.0))).expect("should be due");
        assert_eq!(alert.alert_level, AlertLevel::Critical);
    }

    #[test]
    fn alerts_order_most_overdue_first_with_id_tie_break() {
        let alerts = build_alerts(vec![
            asset("mach-c", 260.0, Some(250.0)),
            asset("mach-b", 400.0, Some(250.0)),
            asset("mach-d", 260.0, Some(250.0)),
            asset("mach-a", 255.0, Some(250.0)),
        ]);
        let order: Vec<_> = alerts
            .iter()
            .map(|alert| alert.machinery_id.as_str())
            .collect();
        assert_eq!(order, ["mach-b", "mach-c", "mach-d", "mach-a"]);
        assert_eq!(alerts[0].alert_level, AlertLevel::Critical);
        assert_eq!(alerts[1].alert_level, AlertLevel::Warning);
    }

    #[test]
    fn alert_carries_the_asset_identity_and_readings() {
        let alerts = build_alerts(vec![asset("mach-a", 321.5, Some(250.0))]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].machinery_id, "mach-a");
        assert_eq!(alerts[0].machinery_name, "asset mach-a");
        assert_eq!(alerts[0].machinery_code, "code-mach-a");
        assert_eq!(alerts[0].current_hours, 321.5);
        assert_eq!(alerts[0].next_maintenance_hours, 250.0);
        assert_eq!(alerts[0].hours_until_maintenance, -71.5);
    }
}
