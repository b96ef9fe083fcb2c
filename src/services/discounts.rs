//! Discount application and administration

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::discount::{Discount, DiscountRequest, DiscountUsage},
    repository::{discounts::DiscountsRepository, memberships::MembershipsRepository},
};

/// How the membership plan for a discount application was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanResolution {
    /// Given by the caller
    Supplied(Uuid),
    /// Taken from the customer's active membership
    Inferred(Uuid),
    NoActiveMembership,
    /// The membership lookup itself failed
    LookupFailed,
}

impl PlanResolution {
    pub fn plan_id(&self) -> Option<Uuid> {
        match self {
            PlanResolution::Supplied(id) | PlanResolution::Inferred(id) => Some(*id),
            PlanResolution::NoActiveMembership | PlanResolution::LookupFailed => None,
        }
    }
}

/// Resolve the plan to check restrictions against.
///
/// A failed membership lookup does not fail the application; it is logged
/// and the discount proceeds without a plan.
pub async fn resolve_plan(
    memberships: &dyn MembershipsRepository,
    customer_id: Uuid,
    supplied: Option<Uuid>,
) -> PlanResolution {
    if let Some(plan_id) = supplied {
        return PlanResolution::Supplied(plan_id);
    }
    match memberships.active_plan_for_customer(customer_id).await {
        Ok(Some(plan_id)) => PlanResolution::Inferred(plan_id),
        Ok(None) => PlanResolution::NoActiveMembership,
        Err(e) => {
            tracing::warn!(%customer_id, error = %e, "Membership lookup failed, applying discount without plan");
            PlanResolution::LookupFailed
        }
    }
}

#[derive(Clone)]
pub struct DiscountsService {
    discounts: Arc<dyn DiscountsRepository>,
    memberships: Arc<dyn MembershipsRepository>,
}

impl DiscountsService {
    pub fn new(
        discounts: Arc<dyn DiscountsRepository>,
        memberships: Arc<dyn MembershipsRepository>,
    ) -> Self {
        Self { discounts, memberships }
    }

    /// Apply the discount called `name` for a customer and record the usage
    pub async fn apply_discount(
        &self,
        name: &str,
        customer_id: Uuid,
        membership_plan_id: Option<Uuid>,
    ) -> AppResult<Discount> {
        let discount = self
            .discounts
            .get_active_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound("Discount not found".to_string()))?;

        let plan = resolve_plan(self.memberships.as_ref(), customer_id, membership_plan_id).await;
        let cap = discount.usage_cap();

        if let Some(cap) = cap {
            let used = self.discounts.usage_count(customer_id, discount.id).await?;
            if used >= cap {
                return Err(AppError::Forbidden("discount usage limit reached".to_string()));
            }
        }

        if let Some(plan_id) = plan.plan_id() {
            if !discount.allows_plan(plan_id) {
                return Err(AppError::Forbidden(
                    "discount not valid for this membership plan".to_string(),
                ));
            }
        }

        // Another request may have taken the last use since the check above
        let usage = self
            .discounts
            .record_usage(customer_id, discount.id, cap)
            .await?
            .ok_or_else(|| AppError::Forbidden("discount usage limit reached".to_string()))?;

        tracing::info!(
            discount = %discount.name,
            %customer_id,
            usage,
            plan = ?plan,
            "Discount applied"
        );
        Ok(discount)
    }

    pub async fn list(&self) -> AppResult<Vec<Discount>> {
        self.discounts.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Discount> {
        self.discounts.get_by_id(id).await
    }

    pub async fn create(&self, request: &DiscountRequest, staff_id: Uuid) -> AppResult<Discount> {
        request.check()?;
        self.discounts.create(request, staff_id).await
    }

    pub async fn update(&self, id: Uuid, request: &DiscountRequest, staff_id: Uuid) -> AppResult<Discount> {
        request.check()?;
        self.discounts.update(id, request, staff_id).await
    }

    pub async fn delete(&self, id: Uuid, staff_id: Uuid) -> AppResult<()> {
        self.discounts.delete(id, staff_id).await
    }

    pub async fn usage(&self, customer_id: Uuid, discount_id: Uuid) -> AppResult<DiscountUsage> {
        // 404 for unknown discounts rather than a zero count
        self.discounts.get_by_id(discount_id).await?;
        let usage_count = self.discounts.usage_count(customer_id, discount_id).await?;
        Ok(DiscountUsage {
            customer_id,
            discount_id,
            usage_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::DiscountType,
        repository::{discounts::MockDiscountsRepository, memberships::MockMembershipsRepository},
    };
    use chrono::{Duration, Utc};
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    fn save10(use_per_client: Option<i32>, restricted: Vec<Uuid>) -> Discount {
        Discount {
            id: Uuid::new_v4(),
            name: "SAVE10".to_string(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_percent: 10,
            discount_amount: None,
            is_use_unlimited: false,
            use_per_client,
            is_active: true,
            valid_from: Utc::now() - Duration::days(1),
            valid_to: None,
            max_redemptions: None,
            times_redeemed: 0,
            restricted_plan_ids: restricted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Store that keeps usage counts in memory and honours the cap like the SQL upsert
    fn counting_store(discount: Discount) -> MockDiscountsRepository {
        let counts = Arc::new(Mutex::new(0));
        let read = counts.clone();
        let mut store = MockDiscountsRepository::new();
        store
            .expect_get_active_by_name()
            .returning(move |_| Ok(Some(discount.clone())));
        store
            .expect_usage_count()
            .returning(move |_, _| Ok(*read.lock().unwrap()));
        store.expect_record_usage().returning(move |_, _, cap| {
            let mut count = counts.lock().unwrap();
            if cap.map_or(false, |cap| *count >= cap) {
                return Ok(None);
            }
            *count += 1;
            Ok(Some(*count))
        });
        store
    }

    fn no_membership() -> MockMembershipsRepository {
        let mut memberships = MockMembershipsRepository::new();
        memberships
            .expect_active_plan_for_customer()
            .returning(|_| Ok(None));
        memberships
    }

    #[tokio::test]
    async fn test_usage_cap_allows_exactly_n() {
        let service = DiscountsService::new(
            Arc::new(counting_store(save10(Some(1), Vec::new()))),
            Arc::new(no_membership()),
        );
        let customer = Uuid::new_v4();

        let first = assert_ok!(service.apply_discount("SAVE10", customer, None).await);
        assert_eq!(first.name, "SAVE10");

        match assert_err!(service.apply_discount("SAVE10", customer, None).await) {
            AppError::Forbidden(msg) => assert_eq!(msg, "discount usage limit reached"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cap_of_three() {
        let service = DiscountsService::new(
            Arc::new(counting_store(save10(Some(3), Vec::new()))),
            Arc::new(no_membership()),
        );
        let customer = Uuid::new_v4();
        for _ in 0..3 {
            assert_ok!(service.apply_discount("SAVE10", customer, None).await);
        }
        assert!(matches!(
            service.apply_discount("SAVE10", customer, None).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_unlimited_discount_ignores_cap() {
        let mut discount = save10(Some(1), Vec::new());
        discount.is_use_unlimited = true;
        let service = DiscountsService::new(Arc::new(counting_store(discount)), Arc::new(no_membership()));
        let customer = Uuid::new_v4();
        for _ in 0..5 {
            assert_ok!(service.apply_discount("SAVE10", customer, None).await);
        }
    }

    #[tokio::test]
    async fn test_concurrent_cap_loss_is_forbidden() {
        let discount = save10(Some(1), Vec::new());
        let mut store = MockDiscountsRepository::new();
        store
            .expect_get_active_by_name()
            .returning(move |_| Ok(Some(discount.clone())));
        store.expect_usage_count().returning(|_, _| Ok(0));
        store.expect_record_usage().returning(|_, _, _| Ok(None));

        let service = DiscountsService::new(Arc::new(store), Arc::new(no_membership()));
        let result = service.apply_discount("SAVE10", Uuid::new_v4(), None).await;
        assert!(matches!(assert_err!(result), AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_unknown_discount_is_not_found() {
        let mut store = MockDiscountsRepository::new();
        store.expect_get_active_by_name().returning(|_| Ok(None));
        store.expect_record_usage().never();

        let service = DiscountsService::new(Arc::new(store), Arc::new(MockMembershipsRepository::new()));
        match assert_err!(service.apply_discount("NOPE", Uuid::new_v4(), None).await) {
            AppError::NotFound(msg) => assert_eq!(msg, "Discount not found"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plan_restriction() {
        let gold = Uuid::new_v4();
        let silver = Uuid::new_v4();

        let service = DiscountsService::new(
            Arc::new(counting_store(save10(None, vec![gold]))),
            Arc::new(MockMembershipsRepository::new()),
        );
        match assert_err!(service.apply_discount("SAVE10", Uuid::new_v4(), Some(silver)).await) {
            AppError::Forbidden(msg) => assert_eq!(msg, "discount not valid for this membership plan"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_ok!(service.apply_discount("SAVE10", Uuid::new_v4(), Some(gold)).await);
    }

    #[tokio::test]
    async fn test_inferred_plan_is_checked() {
        let gold = Uuid::new_v4();
        let silver = Uuid::new_v4();
        let mut memberships = MockMembershipsRepository::new();
        memberships
            .expect_active_plan_for_customer()
            .returning(move |_| Ok(Some(silver)));

        let service = DiscountsService::new(
            Arc::new(counting_store(save10(None, vec![gold]))),
            Arc::new(memberships),
        );
        assert!(matches!(
            service.apply_discount("SAVE10", Uuid::new_v4(), None).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_restriction_skipped_without_plan() {
        let service = DiscountsService::new(
            Arc::new(counting_store(save10(None, vec![Uuid::new_v4()]))),
            Arc::new(no_membership()),
        );
        assert_ok!(service.apply_discount("SAVE10", Uuid::new_v4(), None).await);
    }

    #[tokio::test]
    async fn test_resolve_plan_variants() {
        let customer = Uuid::new_v4();
        let plan = Uuid::new_v4();

        let untouched = MockMembershipsRepository::new();
        assert_eq!(
            resolve_plan(&untouched, customer, Some(plan)).await,
            PlanResolution::Supplied(plan)
        );

        let mut active = MockMembershipsRepository::new();
        active
            .expect_active_plan_for_customer()
            .returning(move |_| Ok(Some(plan)));
        assert_eq!(resolve_plan(&active, customer, None).await, PlanResolution::Inferred(plan));

        assert_eq!(
            resolve_plan(&no_membership(), customer, None).await,
            PlanResolution::NoActiveMembership
        );

        let mut failing = MockMembershipsRepository::new();
        failing
            .expect_active_plan_for_customer()
            .returning(|_| Err(AppError::Internal("timeout".to_string())));
        let resolution = resolve_plan(&failing, customer, None).await;
        assert_eq!(resolution, PlanResolution::LookupFailed);
        assert_eq!(resolution.plan_id(), None);
    }

    #[tokio::test]
    async fn test_create_validates_before_storage() {
        let mut store = MockDiscountsRepository::new();
        store.expect_create().never();
        let service = DiscountsService::new(Arc::new(store), Arc::new(MockMembershipsRepository::new()));

        let request = DiscountRequest {
            name: "FLAT5".to_string(),
            description: None,
            discount_type: DiscountType::FixedAmount,
            discount_percent: 0,
            discount_amount: None,
            is_use_unlimited: true,
            use_per_client: None,
            is_active: true,
            valid_from: Utc::now(),
            valid_to: None,
            max_redemptions: None,
            restricted_plan_ids: Vec::new(),
        };
        assert!(matches!(
            service.create(&request, Uuid::new_v4()).await,
            Err(AppError::Validation(_))
        ));
    }
}
