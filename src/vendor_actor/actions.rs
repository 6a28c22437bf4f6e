use crate::domain::{VendorReview, VendorStatus};

#[derive(Debug, Clone)]
pub enum VendorAction {
    Review(VendorReview),
}

#[derive(Debug, Clone, PartialEq)]
pub enum VendorActionResult {
    Reviewed { from: VendorStatus, to: VendorStatus },
}
