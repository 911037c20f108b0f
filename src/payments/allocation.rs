use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::types::Amount;

/// balances and flows entering one allocation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRequest {
    pub prev_principal: Money,
    pub prev_interest: Money,
    /// interest accrued since the previous line
    pub accrued_interest: Money,
    pub borrowing: Amount,
    pub repayment: Amount,
}

impl AllocationRequest {
    /// borrowing minus repayment
    pub fn net_flow(&self) -> Result<Money> {
        self.borrowing.value.try_sub(self.repayment.value)
    }
}

/// which bucket absorbed the net flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationRoute {
    Principal,
    Interest,
    /// applied to interest which then crossed zero and moved into principal
    InterestToPrincipal,
}

/// balances after one allocation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub change_of_principal: Money,
    pub remaining_interest: Money,
    pub remaining_principal: Money,
    pub route: AllocationRoute,
}

/// cash flow plus accrual set against the change across both balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    pub flow: Money,
    pub principal_change: Money,
    pub interest_change: Money,
}

impl BalanceCheck {
    pub fn is_balanced(&self) -> bool {
        self.principal_change.checked_add(self.interest_change) == Some(self.flow)
    }
}

impl Allocation {
    pub fn balance_check(&self, request: &AllocationRequest) -> Result<BalanceCheck> {
        Ok(BalanceCheck {
            flow: request.net_flow()?.try_add(request.accrued_interest)?,
            principal_change: self.change_of_principal,
            interest_change: self.remaining_interest.try_sub(request.prev_interest)?,
        })
    }

    /// cash flow plus accrual must equal the change across both balances
    pub fn conserves(&self, request: &AllocationRequest) -> Result<bool> {
        Ok(self.balance_check(request)?.is_balanced())
    }
}

/// Apply a line's net flow and fresh interest to the running balances.
///
/// The sign of the previous principal selects the regime. With debt
/// outstanding, borrowings (and principal-directed repayments) go to
/// principal and other repayments pay interest first. With an overpayment
/// the roles mirror. Afterwards neither balance may sit on the far side of
/// zero from the regime: a shortfall in one bucket is pulled from the other.
/// From an exactly settled principal, a flow that takes interest through
/// zero is moved into principal in full.
///
/// Balances too large to represent fail with a calculation error.
pub fn allocate(request: &AllocationRequest) -> Result<Allocation> {
    let pp = request.prev_principal;
    let di = request.net_flow()?;
    let mut rp = pp;
    let mut ri = request.prev_interest.try_add(request.accrued_interest)?;

    let route = if pp.is_positive() {
        let route = if !di.is_negative() || request.repayment.to_principal {
            rp = rp.try_add(di)?;
            AllocationRoute::Principal
        } else {
            ri = ri.try_add(di)?;
            AllocationRoute::Interest
        };
        if rp.is_negative() {
            ri = ri.try_add(rp)?;
            rp = Money::ZERO;
        }
        if ri.is_negative() {
            rp = rp.try_add(ri)?;
            ri = Money::ZERO;
        }
        route
    } else if pp.is_zero() {
        let crossed = ri.try_add(di)?;
        if ri.signum() * di.signum() >= 0 {
            rp = rp.try_add(di)?;
            AllocationRoute::Principal
        } else if ri.signum() * crossed.signum() <= 0 {
            rp = crossed;
            ri = Money::ZERO;
            AllocationRoute::InterestToPrincipal
        } else {
            ri = crossed;
            AllocationRoute::Interest
        }
    } else {
        let route = if !di.is_positive() || request.borrowing.to_principal {
            rp = rp.try_add(di)?;
            AllocationRoute::Principal
        } else {
            ri = ri.try_add(di)?;
            AllocationRoute::Interest
        };
        if rp.is_positive() {
            ri = ri.try_add(rp)?;
            rp = Money::ZERO;
        }
        if ri.is_positive() {
            rp = rp.try_add(ri)?;
            ri = Money::ZERO;
        }
        route
    };

    Ok(Allocation {
        change_of_principal: rp.try_sub(pp)?,
        remaining_interest: ri,
        remaining_principal: rp,
        route,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pp: i64, pi: i64, ti: i64, borrow: i64, repay: i64) -> AllocationRequest {
        AllocationRequest {
            prev_principal: Money::from_major(pp),
            prev_interest: Money::from_major(pi),
            accrued_interest: Money::from_major(ti),
            borrowing: Amount::new(Money::from_major(borrow), false),
            repayment: Amount::new(Money::from_major(repay), false),
        }
    }

    fn balances(a: &Allocation) -> (Money, Money, Money) {
        (a.change_of_principal, a.remaining_interest, a.remaining_principal)
    }

    fn m(cp: i64, ri: i64, rp: i64) -> (Money, Money, Money) {
        (Money::from_major(cp), Money::from_major(ri), Money::from_major(rp))
    }

    #[test]
    fn test_borrowing_adds_to_principal() {
        let a = allocate(&request(10_000, 0, 2_000, 100_000, 0)).unwrap();
        assert_eq!(balances(&a), m(100_000, 2_000, 110_000));
        assert_eq!(a.route, AllocationRoute::Principal);
    }

    #[test]
    fn test_repayment_pays_interest_first() {
        let a = allocate(&request(1_110_000, 21_800, 166_956, 0, 300_000)).unwrap();
        assert_eq!(balances(&a), m(-111_244, 0, 998_756));
        assert_eq!(a.route, AllocationRoute::Interest);
    }

    #[test]
    fn test_repayment_smaller_than_interest() {
        let a = allocate(&request(500_000, 0, 126_674, 0, 100_000)).unwrap();
        assert_eq!(balances(&a), m(0, 26_674, 500_000));
    }

    #[test]
    fn test_principal_directed_repayment() {
        let mut req = request(500_000, 26_674, 48_826, 0, 50_000);
        req.repayment.to_principal = true;
        let a = allocate(&req).unwrap();
        assert_eq!(balances(&a), m(-50_000, 75_500, 450_000));
    }

    #[test]
    fn test_repayment_overshoots_into_overpayment() {
        let a = allocate(&request(300_000, 0, 54_000, 0, 400_000)).unwrap();
        assert_eq!(balances(&a), m(-346_000, 0, -46_000));
    }

    #[test]
    fn test_overpaid_interest_is_negative() {
        let a = allocate(&request(-46_000, 0, -2_300, 0, 10_000)).unwrap();
        assert_eq!(balances(&a), m(-10_000, -2_300, -56_000));
    }

    #[test]
    fn test_borrowing_against_overpayment() {
        let a = allocate(&request(-56_000, -2_300, -2_800, 50_000, 0)).unwrap();
        assert_eq!(balances(&a), m(44_900, 0, -11_100));
        assert_eq!(a.route, AllocationRoute::Interest);

        let a = allocate(&request(-11_100, 0, -555, 200_000, 0)).unwrap();
        assert_eq!(balances(&a), m(199_445, 0, 188_345));
    }

    #[test]
    fn test_principal_directed_borrowing_against_overpayment() {
        let mut req = request(-10_000, -500, -100, 3_000, 0);
        req.borrowing.to_principal = true;
        let a = allocate(&req).unwrap();
        assert_eq!(balances(&a), m(3_000, -600, -7_000));
    }

    #[test]
    fn test_settled_principal_branches() {
        // same sign: principal
        let a = allocate(&request(0, 100, 0, 500, 0)).unwrap();
        assert_eq!(balances(&a), m(500, 100, 500));
        assert_eq!(a.route, AllocationRoute::Principal);

        // crossing through zero: interest then into principal
        let a = allocate(&request(0, 100, 0, 0, 300)).unwrap();
        assert_eq!(balances(&a), m(-200, 0, -200));
        assert_eq!(a.route, AllocationRoute::InterestToPrincipal);

        // exactly cancelling the interest
        let a = allocate(&request(0, 100, 0, 0, 100)).unwrap();
        assert_eq!(balances(&a), m(0, 0, 0));

        // partial: interest only
        let a = allocate(&request(0, 100, 0, 0, 40)).unwrap();
        assert_eq!(balances(&a), m(0, 60, 0));
        assert_eq!(a.route, AllocationRoute::Interest);
    }

    #[test]
    fn test_no_flow_on_settled_balance_is_noop() {
        let a = allocate(&request(0, 0, 0, 0, 0)).unwrap();
        assert_eq!(balances(&a), m(0, 0, 0));
        assert_eq!(a.route, AllocationRoute::Principal);
    }

    #[test]
    fn test_unrepresentable_balance_is_an_error() {
        let huge = Money::from_decimal_truncated(rust_decimal::Decimal::MAX);
        let req = AllocationRequest {
            prev_principal: huge,
            prev_interest: Money::ZERO,
            accrued_interest: Money::ZERO,
            borrowing: Amount::new(huge, false),
            repayment: Amount::zero(),
        };
        assert!(matches!(
            allocate(&req),
            Err(crate::errors::LedgerError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_balance_check_reports_figures() {
        let req = request(1_110_000, 21_800, 166_956, 0, 300_000);
        let a = allocate(&req).unwrap();
        let check = a.balance_check(&req).unwrap();
        assert_eq!(check.flow, Money::from_major(-133_044));
        assert_eq!(check.principal_change, Money::from_major(-111_244));
        assert_eq!(check.interest_change, Money::from_major(-21_800));
        assert!(check.is_balanced());
    }

    #[test]
    fn test_sign_safety_and_conservation_over_grid() {
        let values = [-300_i64, -101, -100, -37, -1, 0, 1, 37, 100, 101, 300];
        for &pp in &values {
            for &pi in &values {
                for &ti in &values {
                    for &borrow in &[0_i64, 1, 100, 250] {
                        for &repay in &[0_i64, 1, 100, 250] {
                            for flags in 0..4 {
                                let mut req = request(pp, pi, ti, borrow, repay);
                                req.borrowing.to_principal = flags & 1 != 0;
                                req.repayment.to_principal = flags & 2 != 0;
                                let a = allocate(&req).unwrap();
                                let rp = a.remaining_principal;
                                let ri = a.remaining_interest;
                                assert!(
                                    !(rp.is_positive() && ri.is_negative()),
                                    "{:?} -> {:?}",
                                    req,
                                    a
                                );
                                assert!(
                                    !(rp.is_negative() && ri.is_positive()),
                                    "{:?} -> {:?}",
                                    req,
                                    a
                                );
                                assert!(a.conserves(&req).unwrap(), "{:?} -> {:?}", req, a);
                            }
                        }
                    }
                }
            }
        }
    }
}
