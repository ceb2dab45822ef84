#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
}

/// Products every agent may observe. Shared read-only by the whole fleet.
pub static PRODUCT_CATALOG: &[Product] = &[
    Product { id: "TEL-4567", name: "Роутер RT-AC68U" },
    Product { id: "TEL-8901", name: "Модем DSL-2640U" },
    Product { id: "TEL-2345", name: "Коммутатор SG-108" },
    Product { id: "TEL-6789", name: "IP-телефон T46S" },
    Product { id: "TEL-3456", name: "Кабель UTP Cat6" },
];
