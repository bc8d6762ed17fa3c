use dashmap::DashMap;
use types::ids::OrderId;
use types::order::OrderReceipt;

/// Storage for created orders. Injected into the handlers through `AppState`.
pub trait OrderStore: Send + Sync {
    fn insert(&self, receipt: OrderReceipt);
    fn get(&self, order_id: &OrderId) -> Option<OrderReceipt>;
    fn len(&self) -> usize;
}

pub struct InMemoryOrderStore {
    orders: DashMap<OrderId, OrderReceipt>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
        }
    }
}

impl OrderStore for InMemoryOrderStore {
    fn insert(&self, receipt: OrderReceipt) {
        self.orders.insert(receipt.order_id, receipt);
    }

    fn get(&self, order_id: &OrderId) -> Option<OrderReceipt> {
        self.orders.get(order_id).map(|entry| entry.value().clone())
    }

    fn len(&self) -> usize {
        self.orders.len()
    }
}
