use serde::{Deserialize, Serialize};

/// Lumber, clay, iron and crop, in this order.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup(pub u32, pub u32, pub u32, pub u32);

impl ResourceGroup {
    pub const fn new(lumber: u32, clay: u32, iron: u32, crop: u32) -> Self {
        Self(lumber, clay, iron, crop)
    }

    pub fn lumber(&self) -> u32 {
        self.0
    }
    pub fn clay(&self) -> u32 {
        self.1
    }
    pub fn iron(&self) -> u32 {
        self.2
    }
    pub fn crop(&self) -> u32 {
        self.3
    }

    /// True when every component is at least the one in `other`.
    pub fn covers(&self, other: &ResourceGroup) -> bool {
        self.0 >= other.0 && self.1 >= other.1 && self.2 >= other.2 && self.3 >= other.3
    }

    /// Largest of lumber, clay and iron: what a warehouse has to hold.
    pub fn max_material(&self) -> u32 {
        self.0.max(self.1).max(self.2)
    }
}

impl core::ops::Sub for ResourceGroup {
    type Output = ResourceGroup;

    fn sub(self, rhs: Self) -> Self::Output {
        ResourceGroup(
            self.0.saturating_sub(rhs.0),
            self.1.saturating_sub(rhs.1),
            self.2.saturating_sub(rhs.2),
            self.3.saturating_sub(rhs.3),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_and_sub() {
        let stock = ResourceGroup::new(500, 500, 500, 100);
        let cost = ResourceGroup::new(200, 300, 100, 150);
        assert!(!stock.covers(&cost));
        assert_eq!(stock - cost, ResourceGroup::new(300, 200, 400, 0));
        assert_eq!(cost.max_material(), 300);
    }
}
