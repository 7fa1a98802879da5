/// A cart count indicator shown somewhere in the UI chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub name: &'static str,
    pub text: String,
    pub visible: bool,
}

/// Every badge display showing the cart count. They always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeSet {
    badges: Vec<Badge>,
}

impl BadgeSet {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            badges: names
                .iter()
                .map(|&name| Badge {
                    name,
                    text: "0".to_string(),
                    visible: false,
                })
                .collect(),
        }
    }

    /// Show `count` everywhere; badges hide while the cart is empty.
    pub fn set_count(&mut self, count: u32) {
        for b in &mut self.badges {
            b.text = count.to_string();
            b.visible = count > 0;
        }
    }

    pub fn reset(&mut self) {
        self.set_count(0);
    }

    pub fn get(&self, name: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter()
    }
}
