use std::sync::Arc;

use anyhow::Result;
use crates::domain::{
    repositories::plans::PlanRepository, value_objects::plans::PlanDto,
};
use tracing::info;

/// Read-only catalog view for the portal. Ordering (price ascending) comes
/// from the repository.
pub struct PlanCatalogUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
}

impl<P> PlanCatalogUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>) -> Self {
        Self { plan_repo }
    }

    pub async fn list_active_plans(&self) -> Result<Vec<PlanDto>> {
        let plans = self.plan_repo.list_active_plans().await?;
        info!(plan_count = plans.len(), "plan_catalog: active plans loaded");
        Ok(plans.into_iter().map(PlanDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crates::domain::{
        entities::plans::PlanEntity, repositories::plans::MockPlanRepository,
    };

    #[tokio::test]
    async fn maps_active_plans_to_dtos() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo.expect_list_active_plans().returning(|| {
            Box::pin(async {
                Ok(vec![PlanEntity {
                    id: 1,
                    name: "Hour Pass".to_string(),
                    price_minor: 200,
                    duration_minutes: 60,
                    is_active: true,
                    created_at: Utc::now(),
                }])
            })
        });

        let usecase = PlanCatalogUseCase::new(Arc::new(plan_repo));
        let plans = usecase.list_active_plans().await.unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, "Hour Pass");
        assert_eq!(plans[0].price_minor, 200);
    }
}
