pub mod ad_spend;
pub mod call_inquiry;

pub use ad_spend::Entity as AdSpendEntity;
pub use call_inquiry::Entity as CallInquiryEntity;
