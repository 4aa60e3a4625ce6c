use fxhash::FxHashSet;

/// Last known favorite pins of the signed-in user.
///
/// Replaced wholesale on every re-fetch; toggles update it optimistically
/// once the service has accepted them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteStatus {
    pins: FxHashSet<String>,
}

impl FavoriteStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_all(&mut self, pins: FxHashSet<String>) {
        self.pins = pins;
    }

    pub fn clear(&mut self) {
        self.pins.clear();
    }

    pub fn is_favorite(&self, pin_id: &str) -> bool {
        self.pins.contains(pin_id)
    }

    pub fn mark(&mut self, pin_id: &str, favorite: bool) {
        if favorite {
            self.pins.insert(pin_id.to_string());
        } else {
            self.pins.remove(pin_id);
        }
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn pins(&self) -> impl Iterator<Item = &str> {
        self.pins.iter().map(String::as_str)
    }
}
