use crate::geo::ScreenPoint;
use crate::models::DateRange;
use crate::pointer::HoverTarget;
use crate::surface::SurfaceController;

/// Gap between the top of the pin and the bottom of the card.
const CARD_GAP_PX: f64 = 8.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    fn eras(self) -> (&'static str, &'static str) {
        match self {
            Locale::En => ("BCE", "CE"),
            Locale::Ar => ("ق.م", "م"),
        }
    }

    /// Display label for a period, falling back to the raw label.
    pub fn period_label<'a>(self, period: &'a str) -> &'a str {
        if self == Locale::En {
            return period;
        }
        match period {
            "Ancient Egyptian" => "مصر القديمة",
            "Ptolemaic" => "البطلمي",
            "Roman" => "الروماني",
            "Byzantine" => "البيزنطي",
            "Islamic" => "الإسلامي",
            other => other,
        }
    }
}

/// A single year with its era suffix; negative years are BCE.
pub fn format_year(year: i32, locale: Locale) -> String {
    let (bce, ce) = locale.eras();
    if year < 0 {
        format!("{} {bce}", year.unsigned_abs())
    } else {
        format!("{year} {ce}")
    }
}

/// `2686 – 2181 BCE` when both ends share an era, `30 BCE – 395 CE` otherwise.
pub fn format_date_range(range: DateRange, locale: Locale) -> String {
    let (bce, ce) = locale.eras();
    let start_bce = range.start < 0;
    let end_bce = range.end < 0;
    if start_bce == end_bce {
        let era = if start_bce { bce } else { ce };
        format!(
            "{} – {} {era}",
            range.start.unsigned_abs(),
            range.end.unsigned_abs()
        )
    } else {
        format!(
            "{} – {}",
            format_year(range.start, locale),
            format_year(range.end, locale)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub label: String,
    /// `#rrggbb`
    pub color: String,
}

/// Content and placement of the hover preview for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewCard {
    pub site_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub badge: Badge,
    pub date_range: String,
    /// Container pixel of the marker's coordinate.
    pub anchor: ScreenPoint,
    /// Distance above `anchor` where the card's bottom edge sits.
    pub offset_y: f64,
}

impl PreviewCard {
    /// Card for the active hover, projected with the surface's current view.
    pub fn compute(hover: Option<&HoverTarget>, surface: &SurfaceController, locale: Locale) -> Option<Self> {
        let hover = hover?;
        let feature = surface
            .marker_features()
            .filter(|f| f.site_id() == hover.site_id)
            .last()?;
        let anchor = surface.pixel_for(hover.anchor)?;
        let site = feature.site();
        Some(Self {
            site_id: site.id.clone(),
            title: site.display_name.clone(),
            thumbnail_url: site.thumbnail_url.clone(),
            badge: Badge {
                label: locale.period_label(&site.period).to_string(),
                color: feature.color.to_hex(),
            },
            date_range: format_date_range(site.date_range, locale),
            anchor,
            offset_y: feature.icon.height + CARD_GAP_PX,
        })
    }
}
