use crate::catalog::CatalogSource;
use crate::models::{ListingRecord, Rooms, TransactionCategory};
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Built-in listings for demos and tests
pub struct SampleCatalog;

impl SampleCatalog {
    pub fn listings() -> Vec<ListingRecord> {
        vec![
            ListingRecord {
                id: 1,
                title: "마포 래미안 푸르지오".to_string(),
                address: "서울 마포구 아현동 777".to_string(),
                tags: vec!["아파트".to_string(), "역세권".to_string()],
                transaction_category: TransactionCategory::Sale,
                rooms: Rooms::from(3),
                price: "12억".to_string(),
                area: "84㎡".to_string(),
                options: vec!["주차 가능".to_string(), "엘리베이터".to_string()],
                facilities: vec!["헬스장".to_string()],
            },
            ListingRecord {
                id: 2,
                title: "성수동 신축 빌라".to_string(),
                address: "서울 성동구 성수동2가 31".to_string(),
                tags: vec!["빌라".to_string()],
                transaction_category: TransactionCategory::DepositLease,
                rooms: Rooms::from(2),
                price: "1억 5천".to_string(),
                area: "59㎡".to_string(),
                options: vec!["주차 가능".to_string()],
                facilities: vec![],
            },
            ListingRecord {
                id: 3,
                title: "신림역 도보 5분 원룸".to_string(),
                address: "서울 관악구 신림동 1422".to_string(),
                tags: vec!["원룸".to_string(), "역세권".to_string()],
                transaction_category: TransactionCategory::MonthlyLease,
                rooms: Rooms::from("1"),
                price: "월세 500/45".to_string(),
                area: "23㎡".to_string(),
                options: vec!["풀옵션".to_string()],
                facilities: vec![],
            },
            ListingRecord {
                id: 4,
                title: "잠실 엘스 대형 평수".to_string(),
                address: "서울 송파구 잠실동 19".to_string(),
                tags: vec!["아파트".to_string()],
                transaction_category: TransactionCategory::Sale,
                rooms: Rooms::from(4),
                price: "27억".to_string(),
                area: "119㎡".to_string(),
                options: vec!["주차 가능".to_string(), "엘리베이터".to_string()],
                facilities: vec!["헬스장".to_string(), "수영장".to_string()],
            },
            ListingRecord {
                id: 5,
                title: "분당 정자동 오피스텔".to_string(),
                address: "경기 성남시 분당구 정자동 8".to_string(),
                tags: vec!["오피스텔".to_string()],
                transaction_category: TransactionCategory::DepositLease,
                rooms: Rooms::from(2),
                price: "3억".to_string(),
                area: "면적 협의".to_string(),
                options: vec!["엘리베이터".to_string()],
                facilities: vec![],
            },
            ListingRecord {
                id: 6,
                title: "연남동 단독주택".to_string(),
                address: "서울 마포구 연남동 240".to_string(),
                tags: vec!["주택".to_string()],
                transaction_category: TransactionCategory::Sale,
                rooms: Rooms::from(5),
                price: "가격 협의".to_string(),
                area: "132㎡".to_string(),
                options: vec!["주차 가능".to_string()],
                facilities: vec![],
            },
        ]
    }
}

#[async_trait]
impl CatalogSource for SampleCatalog {
    async fn load(&self) -> Result<Vec<ListingRecord>> {
        let listings = Self::listings();
        info!("Using {} built-in sample listings", listings.len());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "sample"
    }
}
