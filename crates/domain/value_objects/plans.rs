use serde::Serialize;

use crate::domain::entities::plans::PlanEntity;

#[derive(Debug, Clone, Serialize)]
pub struct PlanDto {
    pub id: i64,
    pub name: String,
    pub price_minor: i32,
    pub duration_minutes: i32,
}

impl From<PlanEntity> for PlanDto {
    fn from(plan: PlanEntity) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            price_minor: plan.price_minor,
            duration_minutes: plan.duration_minutes,
        }
    }
}
