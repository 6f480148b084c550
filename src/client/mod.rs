//! Client-side cart store.
//!
//! One owned state object (active session plus cart) with controlled
//! mutation entry points and change notification. Every mutation mirrors the
//! cart to durable storage under the active user's email; on login the
//! durable cart for that email replaces whatever was active before.

mod storage;

pub use storage::{MemoryStorage, Storage, StorageKey};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartLine};
use crate::routes::checkout::{CheckoutItem, CheckoutRequest};

/// Active login session mirrored to durable storage.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub is_admin: bool,
    pub name: String,
    pub email: String,
}

type Subscriber = Box<dyn FnMut(&Cart)>;

pub struct CartStore<S: Storage> {
    storage: S,
    session: Option<Session>,
    cart: Cart,
    subscribers: Vec<Subscriber>,
}

impl<S: Storage> CartStore<S> {
    /// Restore any previous session, and its cart, from durable storage.
    pub fn open(storage: S) -> Self {
        let session = match (storage.get(&StorageKey::Token), storage.get(&StorageKey::Email)) {
            (Some(token), Some(email)) => Some(Session {
                token,
                is_admin: storage.get(&StorageKey::IsAdmin).as_deref() == Some("true"),
                name: storage.get(&StorageKey::Name).unwrap_or_default(),
                email,
            }),
            _ => None,
        };
        let cart = match &session {
            Some(s) => load_cart(&storage, &s.email),
            None => Cart::default(),
        };
        Self {
            storage,
            session,
            cart,
            subscribers: Vec::new(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Register a change listener; called after every cart replacement or
    /// mutation.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Cart) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Start a session: persist the session keys and swap in the durable
    /// cart stored for this email, discarding the previous active cart.
    pub fn login(
        &mut self,
        token: impl Into<String>,
        is_admin: bool,
        name: impl Into<String>,
        email: impl Into<String>,
    ) {
        let session = Session {
            token: token.into(),
            is_admin,
            name: name.into(),
            email: email.into(),
        };
        self.storage.set(&StorageKey::Token, session.token.clone());
        self.storage.set(&StorageKey::IsAdmin, session.is_admin.to_string());
        self.storage.set(&StorageKey::Name, session.name.clone());
        self.storage.set(&StorageKey::Email, session.email.clone());
        self.cart = load_cart(&self.storage, &session.email);
        self.session = Some(session);
        self.notify();
    }

    /// Drop the session and empty the in-memory cart. The durable cart entry
    /// stays behind; the next login under this email restores it.
    pub fn logout(&mut self) {
        self.storage.remove(&StorageKey::Token);
        self.storage.remove(&StorageKey::IsAdmin);
        self.storage.remove(&StorageKey::Name);
        self.storage.remove(&StorageKey::Email);
        self.session = None;
        self.cart.clear();
        self.notify();
    }

    /// Add one unit of a product, merging with an existing line. Optimistic:
    /// no stock check happens client-side.
    pub fn add_product(
        &mut self,
        product_id: Uuid,
        name: impl Into<String>,
        price: Decimal,
        images: Vec<String>,
    ) {
        self.cart.add(CartLine {
            product_id,
            name: name.into(),
            price,
            images,
            qty: 1,
        });
        self.persist();
        self.notify();
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.cart.remove(product_id);
        self.persist();
        self.notify();
    }

    /// Set a line's quantity; anything below 1 is rejected unchanged.
    pub fn set_quantity(&mut self, product_id: Uuid, qty: u32) {
        if self.cart.set_quantity(product_id, qty) {
            self.persist();
            self.notify();
        }
    }

    /// Empty the cart and delete its durable entry.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        if let Some(email) = self.active_email() {
            self.storage.remove(&StorageKey::Cart { email });
        }
        self.notify();
    }

    /// Snapshot the cart into the checkout wire payload.
    pub fn checkout_request(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> CheckoutRequest {
        CheckoutRequest {
            cart_items: self
                .cart
                .lines()
                .iter()
                .map(|l| CheckoutItem {
                    id: l.product_id,
                    name: l.name.clone(),
                    price: l.price,
                    qty: l.qty,
                })
                .collect(),
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    fn active_email(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.email.clone())
    }

    fn persist(&mut self) {
        if let Some(email) = self.active_email() {
            match serde_json::to_string(self.cart.lines()) {
                Ok(json) => self.storage.set(&StorageKey::Cart { email }, json),
                Err(e) => tracing::warn!("failed to encode cart: {e}"),
            }
        }
    }

    fn notify(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber(&self.cart);
        }
    }
}

fn load_cart<S: Storage>(storage: &S, email: &str) -> Cart {
    storage
        .get(&StorageKey::Cart { email: email.to_string() })
        .and_then(|json| serde_json::from_str::<Vec<CartLine>>(&json).ok())
        .map(Cart::from_lines)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn store() -> CartStore<MemoryStorage> {
        CartStore::open(MemoryStorage::new())
    }

    #[test]
    fn anonymous_cart_is_memory_only_and_discarded_on_login() {
        let mut store = store();
        store.add_product(Uuid::new_v4(), "Widget", Decimal::new(10, 0), vec![]);
        assert_eq!(store.cart().line_count(), 1);

        // Login swaps in the durable cart for this email; the anonymous cart
        // was never mirrored anywhere and is gone.
        store.login("t", false, "Alice", "alice@x.com");
        assert!(store.cart().is_empty());
    }

    #[test]
    fn mutations_mirror_to_storage_under_email_key() {
        let mut store = store();
        store.login("t", false, "Alice", "alice@x.com");
        store.add_product(Uuid::new_v4(), "Widget", Decimal::new(10, 0), vec![]);
        assert!(store
            .storage
            .contains(&StorageKey::Cart { email: "alice@x.com".into() }));
    }

    #[test]
    fn logout_keeps_durable_cart_and_relogin_restores_it() {
        let mut store = store();
        let id = Uuid::new_v4();
        store.login("t", false, "Alice", "alice@x.com");
        store.add_product(id, "Widget", Decimal::new(10, 0), vec![]);
        store.add_product(id, "Widget", Decimal::new(10, 0), vec![]);

        store.logout();
        assert!(store.cart().is_empty());
        assert!(store
            .storage
            .contains(&StorageKey::Cart { email: "alice@x.com".into() }));

        store.login("t2", false, "Alice", "alice@x.com");
        assert_eq!(store.cart().line_count(), 1);
        assert_eq!(store.cart().lines()[0].qty, 2);
    }

    #[test]
    fn switching_users_restores_that_users_cart() {
        let mut store = store();
        let widget = Uuid::new_v4();
        let gadget = Uuid::new_v4();

        store.login("ta", false, "Alice", "alice@x.com");
        store.add_product(widget, "Widget", Decimal::new(10, 0), vec![]);
        store.logout();

        store.login("tb", false, "Bob", "bob@x.com");
        assert!(store.cart().is_empty());
        store.add_product(gadget, "Gadget", Decimal::new(20, 0), vec![]);
        store.set_quantity(gadget, 3);
        store.logout();

        store.login("ta2", false, "Alice", "alice@x.com");
        assert_eq!(store.cart().line_count(), 1);
        assert_eq!(store.cart().lines()[0].product_id, widget);

        store.logout();
        store.login("tb2", false, "Bob", "bob@x.com");
        assert_eq!(store.cart().lines()[0].product_id, gadget);
        assert_eq!(store.cart().lines()[0].qty, 3);
    }

    #[test]
    fn clear_cart_deletes_durable_entry() {
        let mut store = store();
        store.login("t", false, "Alice", "alice@x.com");
        store.add_product(Uuid::new_v4(), "Widget", Decimal::new(10, 0), vec![]);
        store.clear_cart();
        assert!(store.cart().is_empty());
        assert!(!store
            .storage
            .contains(&StorageKey::Cart { email: "alice@x.com".into() }));
    }

    #[test]
    fn reopen_restores_session_and_cart() {
        let mut first = store();
        first.login("t", true, "Alice", "alice@x.com");
        first.add_product(Uuid::new_v4(), "Widget", Decimal::new(10, 0), vec![]);
        let storage = first.storage;

        let reopened = CartStore::open(storage);
        let session = reopened.session().expect("session restored");
        assert!(session.is_admin);
        assert_eq!(session.email, "alice@x.com");
        assert_eq!(reopened.cart().line_count(), 1);
    }

    #[test]
    fn subscribers_see_every_mutation() {
        let mut store = store();
        let seen = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&seen);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        let id = Uuid::new_v4();
        store.add_product(id, "Widget", Decimal::new(10, 0), vec![]);
        store.set_quantity(id, 4);
        store.set_quantity(id, 0); // rejected, no notification
        store.remove(id);
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn checkout_request_snapshots_lines() {
        let mut store = store();
        let id = Uuid::new_v4();
        store.add_product(id, "Widget", Decimal::new(100, 0), vec![]);
        store.set_quantity(id, 2);
        let req = store.checkout_request("Alice", "alice@x.com");
        assert_eq!(req.cart_items.len(), 1);
        assert_eq!(req.cart_items[0].qty, 2);
        assert_eq!(req.name, "Alice");
    }
}
