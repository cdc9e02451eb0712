//! 商品知识库
//!
//! 按品类组织的商品规格事实表，含价位档、优缺点与适用场景，
//! 供商品咨询策略渲染推荐文案。新增条目走代码变更，无动态加载。

use once_cell::sync::Lazy;

/// 价位档
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    Budget,
    MidRange,
    Premium,
    Luxury,
}

impl PriceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::Budget => "budget",
            PriceTier::MidRange => "mid_range",
            PriceTier::Premium => "premium",
            PriceTier::Luxury => "luxury",
        }
    }
}

/// 商品规格记录
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub brand: &'static str,
    pub price_tier: PriceTier,
    pub specs: &'static [(&'static str, &'static str)],
    pub use_cases: &'static [&'static str],
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
    pub rating: f64,
    pub description: &'static str,
}

/// 品类画像：类型、关键特性、主流品牌与价位带
#[derive(Debug, Clone)]
pub struct CategoryProfile {
    pub category: &'static str,
    pub types: &'static [&'static str],
    pub key_features: &'static [&'static str],
    pub brands: &'static [&'static str],
    pub price_bands: &'static [(&'static str, &'static str)],
}

static PRODUCTS: Lazy<Vec<ProductRecord>> = Lazy::new(|| {
    vec![
        ProductRecord {
            id: "macbook_air_m2",
            name: "MacBook Air M2",
            category: "laptop",
            brand: "Apple",
            price_tier: PriceTier::Premium,
            specs: &[
                ("processor", "Apple M2"),
                ("ram", "8GB/16GB"),
                ("storage", "256GB-1TB SSD"),
                ("display", "13.6\" Liquid Retina"),
                ("battery", "18 hours"),
            ],
            use_cases: &["student", "business", "creative", "general"],
            pros: &["excellent performance", "amazing battery life", "premium build quality"],
            cons: &["limited ports", "not upgradeable", "higher price"],
            rating: 4.5,
            description: "Incredible performance in a thin and light design, ideal for students and professionals.",
        },
        ProductRecord {
            id: "dell_xps_15",
            name: "Dell XPS 15",
            category: "laptop",
            brand: "Dell",
            price_tier: PriceTier::Premium,
            specs: &[
                ("processor", "Intel Core i7-13700H"),
                ("ram", "16GB/32GB DDR5"),
                ("storage", "512GB-2TB SSD"),
                ("display", "15.6\" FHD+ to 4K OLED"),
                ("graphics", "NVIDIA RTX 4050/4060/4070"),
            ],
            use_cases: &["creative", "business", "development", "gaming"],
            pros: &["stunning 4K display option", "powerful performance", "excellent keyboard"],
            cons: &["can get expensive", "runs warm under load"],
            rating: 4.4,
            description: "A powerhouse laptop with a stunning display for creative professionals and power users.",
        },
        ProductRecord {
            id: "lenovo_ideapad_gaming_3",
            name: "Lenovo IdeaPad Gaming 3",
            category: "laptop",
            brand: "Lenovo",
            price_tier: PriceTier::Budget,
            specs: &[
                ("processor", "AMD Ryzen 5 5600H"),
                ("ram", "8GB/16GB"),
                ("storage", "512GB SSD"),
                ("display", "15.6\" FHD 120Hz"),
                ("graphics", "NVIDIA GTX 1650 / RTX 3050"),
            ],
            use_cases: &["gaming", "student", "general"],
            pros: &["strong value for money", "120Hz display", "easy to upgrade"],
            cons: &["plastic build", "average battery life"],
            rating: 4.1,
            description: "A budget-friendly gaming laptop that covers esports and mainstream titles without breaking $1000.",
        },
        ProductRecord {
            id: "iphone_15_pro",
            name: "iPhone 15 Pro",
            category: "phone",
            brand: "Apple",
            price_tier: PriceTier::Premium,
            specs: &[
                ("processor", "A17 Pro"),
                ("storage", "128GB-1TB"),
                ("display", "6.1\" Super Retina XDR ProMotion"),
                ("camera", "48MP main + 12MP ultra wide + 12MP telephoto"),
            ],
            use_cases: &["general", "business", "creative"],
            pros: &["powerful A17 Pro chip", "excellent camera system", "titanium design"],
            cons: &["expensive", "limited customization"],
            rating: 4.6,
            description: "Apple's flagship with a professional-grade camera system and premium titanium design.",
        },
        ProductRecord {
            id: "samsung_s24_ultra",
            name: "Samsung Galaxy S24 Ultra",
            category: "phone",
            brand: "Samsung",
            price_tier: PriceTier::Premium,
            specs: &[
                ("processor", "Snapdragon 8 Gen 3"),
                ("ram", "12GB/16GB"),
                ("display", "6.8\" Dynamic AMOLED 2X 120Hz"),
                ("camera", "200MP main + periscope zoom"),
                ("battery", "5000 mAh"),
            ],
            use_cases: &["general", "creative", "business"],
            pros: &["incredible camera system", "S Pen integration", "beautiful display"],
            cons: &["large and heavy", "expensive"],
            rating: 4.5,
            description: "Samsung's flagship with an incredible camera system, S Pen and a stunning display.",
        },
        ProductRecord {
            id: "google_pixel_8a",
            name: "Google Pixel 8a",
            category: "phone",
            brand: "Google",
            price_tier: PriceTier::MidRange,
            specs: &[
                ("processor", "Google Tensor G3"),
                ("ram", "8GB"),
                ("display", "6.1\" OLED 120Hz"),
                ("camera", "64MP main + 13MP ultra wide"),
            ],
            use_cases: &["general", "student"],
            pros: &["flagship camera processing", "clean Android", "long software support"],
            cons: &["modest charging speed", "plain design"],
            rating: 4.3,
            description: "The best mid-range camera phone, with Google's AI features at a sensible price.",
        },
        ProductRecord {
            id: "ipad_pro_m2",
            name: "iPad Pro M2",
            category: "tablet",
            brand: "Apple",
            price_tier: PriceTier::Premium,
            specs: &[
                ("processor", "Apple M2"),
                ("storage", "128GB-2TB"),
                ("display", "11\" or 12.9\" Liquid Retina XDR"),
                ("battery", "10 hours"),
            ],
            use_cases: &["creative", "business", "student"],
            pros: &["incredibly powerful", "amazing display", "great accessory support"],
            cons: &["expensive", "iPadOS limitations"],
            rating: 4.6,
            description: "Incredibly powerful tablet with the best display in its class, built for creative work.",
        },
        ProductRecord {
            id: "samsung_tab_s9",
            name: "Samsung Galaxy Tab S9",
            category: "tablet",
            brand: "Samsung",
            price_tier: PriceTier::MidRange,
            specs: &[
                ("processor", "Snapdragon 8 Gen 2"),
                ("ram", "8GB/12GB"),
                ("display", "11\" Dynamic AMOLED 2X 120Hz"),
                ("extras", "S Pen included"),
            ],
            use_cases: &["entertainment", "student", "business"],
            pros: &["S Pen included", "great multitasking", "water resistant"],
            cons: &["Android tablet app gaps"],
            rating: 4.4,
            description: "A versatile Android tablet with the S Pen in the box and solid multitasking.",
        },
    ]
});

static CATEGORY_PROFILES: Lazy<Vec<CategoryProfile>> = Lazy::new(|| {
    vec![
        CategoryProfile {
            category: "laptop",
            types: &["ultrabook", "gaming", "business", "student", "creative"],
            key_features: &["processor", "ram", "storage", "display", "battery"],
            brands: &["Apple", "Dell", "HP", "Lenovo", "Microsoft", "ASUS"],
            price_bands: &[
                ("budget", "under $600"),
                ("mid_range", "$600-$1200"),
                ("premium", "$1200-$2000"),
                ("luxury", "above $2000"),
            ],
        },
        CategoryProfile {
            category: "phone",
            types: &["flagship", "mid_range", "budget", "gaming", "camera_focused"],
            key_features: &["camera", "battery", "display", "processor", "storage"],
            brands: &["Apple", "Samsung", "Google", "OnePlus", "Xiaomi"],
            price_bands: &[
                ("budget", "under $300"),
                ("mid_range", "$300-$700"),
                ("premium", "$700-$1000"),
                ("luxury", "above $1000"),
            ],
        },
        CategoryProfile {
            category: "tablet",
            types: &["productivity", "entertainment", "creative", "budget"],
            key_features: &["display", "processor", "storage", "stylus_support", "battery"],
            brands: &["Apple", "Samsung", "Microsoft", "Amazon", "Lenovo"],
            price_bands: &[
                ("budget", "under $250"),
                ("mid_range", "$250-$600"),
                ("premium", "$600-$1000"),
                ("luxury", "above $1000"),
            ],
        },
    ]
});

/// 同义品类归一（实体提取产出的词干 -> 知识库品类）
fn canonical_category(raw: &str) -> &str {
    match raw.trim().to_lowercase().as_str() {
        "laptop" | "computer" | "pc" | "mac" => "laptop",
        "phone" | "smartphone" | "iphone" | "android" => "phone",
        "tablet" => "tablet",
        _ => "",
    }
}

/// 商品知识查询接口
pub trait ProductLookup: Send + Sync {
    /// 按名称查商品（包含匹配）
    fn record_by_name(&self, name: &str) -> Option<&ProductRecord>;

    /// 按品类列出商品
    fn records_by_category(&self, category: &str) -> Vec<&ProductRecord>;

    /// 按品牌列出商品
    fn records_by_brand(&self, brand: &str) -> Vec<&ProductRecord>;

    /// 品类画像（接受同义词，如 smartphone -> phone）
    fn category_profile(&self, category: &str) -> Option<&CategoryProfile>;
}

/// 编译期固化的商品知识库
#[derive(Debug, Default)]
pub struct StaticProductKb;

impl ProductLookup for StaticProductKb {
    fn record_by_name(&self, name: &str) -> Option<&ProductRecord> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        PRODUCTS
            .iter()
            .find(|p| p.name.to_lowercase().contains(&query))
    }

    fn records_by_category(&self, category: &str) -> Vec<&ProductRecord> {
        let canonical = canonical_category(category);
        PRODUCTS.iter().filter(|p| p.category == canonical).collect()
    }

    fn records_by_brand(&self, brand: &str) -> Vec<&ProductRecord> {
        let query = brand.trim().to_lowercase();
        PRODUCTS
            .iter()
            .filter(|p| p.brand.to_lowercase() == query)
            .collect()
    }

    fn category_profile(&self, category: &str) -> Option<&CategoryProfile> {
        let canonical = canonical_category(category);
        CATEGORY_PROFILES.iter().find(|c| c.category == canonical)
    }
}

/// 创建商品知识库
pub fn create_product_kb() -> Box<dyn ProductLookup> {
    Box::new(StaticProductKb)
}
