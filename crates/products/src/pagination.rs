//! Length-aware pages and the page-link control that goes with them.

use serde::Serialize;

/// Page numbers shown on each side of the current page in a sliding window.
pub const ON_EACH_SIDE: u32 = 3;

pub const PREVIOUS_LABEL: &str = "« Previous";
pub const NEXT_LABEL: &str = "Next »";
pub const ELLIPSIS_LABEL: &str = "...";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    /// 1-based position of the first item on this page; `None` when empty.
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub links: Vec<PageLink>,
}

/// One entry of the page-link control. `page == None` renders disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: Option<u32>,
    pub label: String,
    pub active: bool,
}

impl PageLink {
    fn number(page: u32, current: u32) -> Self {
        Self {
            page: Some(page),
            label: page.to_string(),
            active: page == current,
        }
    }

    fn disabled(label: &str) -> Self {
        Self {
            page: None,
            label: label.to_string(),
            active: false,
        }
    }
}

impl<T> Page<T> {
    /// `current_page` is echoed even when it lies past the last page.
    pub fn new(items: Vec<T>, current_page: u32, per_page: u32, total: u64) -> Self {
        let last_page = last_page(total, per_page);
        let (from, to) = if items.is_empty() {
            (None, None)
        } else {
            let first = u64::from(current_page - 1) * u64::from(per_page) + 1;
            (Some(first), Some(first + items.len() as u64 - 1))
        };
        Self {
            items,
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
            links: page_links(current_page, last_page),
        }
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// Number of pages needed for `total` items; never less than 1.
pub fn last_page(total: u64, per_page: u32) -> u32 {
    let pages = total.div_ceil(u64::from(per_page.max(1))).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Previous link, page numbers (windowed with ellipses for long runs), next link.
pub fn page_links(current: u32, last: u32) -> Vec<PageLink> {
    let mut links = Vec::new();

    links.push(PageLink {
        page: (current > 1).then(|| current - 1),
        label: PREVIOUS_LABEL.to_string(),
        active: false,
    });

    for segment in window(current, last) {
        match segment {
            Segment::Pages(first, end) => {
                links.extend((first..=end).map(|p| PageLink::number(p, current)));
            }
            Segment::Gap => links.push(PageLink::disabled(ELLIPSIS_LABEL)),
        }
    }

    links.push(PageLink {
        page: (current < last).then(|| current + 1),
        label: NEXT_LABEL.to_string(),
        active: false,
    });

    links
}

enum Segment {
    Pages(u32, u32),
    Gap,
}

fn window(current: u32, last: u32) -> Vec<Segment> {
    use Segment::{Gap, Pages};

    if last < ON_EACH_SIDE * 2 + 8 {
        return vec![Pages(1, last)];
    }

    let window = ON_EACH_SIDE + 4;
    if current <= window {
        vec![Pages(1, window + ON_EACH_SIDE), Gap, Pages(last - 1, last)]
    } else if current > last - window {
        vec![Pages(1, 2), Gap, Pages(last - (window + ON_EACH_SIDE - 1), last)]
    } else {
        vec![
            Pages(1, 2),
            Gap,
            Pages(current - ON_EACH_SIDE, current + ON_EACH_SIDE),
            Gap,
            Pages(last - 1, last),
        ]
    }
}
