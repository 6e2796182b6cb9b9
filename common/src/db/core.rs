use crate::db::indices::NetId;
use crate::error::AssignError;
use crate::geom::point::Point;
use crate::geom::span::Span;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::collections::HashSet;

pub type Pin = Point<Decimal>;

/// A wiring demand: a horizontal trunk of `width` tracks with a vertical stub
/// down (or up) to each pin.
///
/// Nets are value objects. Geometry is derived once at construction and
/// never changes afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Net {
    pub id: NetId,
    pub name: String,
    pins: Vec<Pin>,
    width: Decimal,
    span: Span,
    mid_bottom_y: Decimal,
    mid_upper_y: Decimal,
}

impl Net {
    pub fn new(
        id: NetId,
        name: impl Into<String>,
        pins: Vec<Pin>,
        width: Decimal,
    ) -> Result<Self, AssignError> {
        let name = name.into();
        if pins.len() < 2 {
            return Err(AssignError::InvalidNet {
                name,
                reason: format!("a net needs at least 2 pins, got {}", pins.len()),
            });
        }
        if width <= Decimal::ZERO {
            return Err(AssignError::InvalidNet {
                name,
                reason: format!("track width must be positive, got {}", width),
            });
        }

        let (mut min_x, mut max_x) = (pins[0].x, pins[0].x);
        let (mut min_y, mut max_y) = (pins[0].y, pins[0].y);
        for p in &pins[1..] {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        Ok(Self {
            id,
            name,
            pins,
            width,
            span: Span::new(min_x, max_x),
            mid_bottom_y: min_y,
            mid_upper_y: max_y,
        })
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn width(&self) -> Decimal {
        self.width
    }

    pub fn is_unit_width(&self) -> bool {
        self.width == Decimal::ONE
    }

    pub fn span(&self) -> Span {
        self.span
    }

    #[inline]
    pub fn minx(&self) -> Decimal {
        self.span.min
    }

    #[inline]
    pub fn maxx(&self) -> Decimal {
        self.span.max
    }

    pub fn mid_bottom_y(&self) -> Decimal {
        self.mid_bottom_y
    }

    pub fn mid_upper_y(&self) -> Decimal {
        self.mid_upper_y
    }

    /// Natural trunk height of the net: the middle of its pin span.
    pub fn midy(&self) -> Decimal {
        (self.mid_bottom_y + self.mid_upper_y) / Decimal::TWO
    }

    pub fn y_span(&self) -> Decimal {
        self.mid_upper_y - self.mid_bottom_y
    }

    /// Vertical wire needed with the trunk at `given_midy`: the pin span,
    /// stretched to reach the trunk when it lies outside.
    pub fn vertical_wirelength(&self, given_midy: Decimal) -> Decimal {
        self.mid_upper_y.max(given_midy) - self.mid_bottom_y.min(given_midy)
    }

    /// Wire in excess of the pin span; zero for any trunk inside the span.
    pub fn vertical_detour(&self, given_midy: Decimal) -> Decimal {
        self.vertical_wirelength(given_midy) - self.y_span()
    }

    pub fn horizontal_wirelength(&self) -> Decimal {
        self.span.length()
    }
}

/// Ordered collection of nets. Algorithms work on a private clone and shrink
/// it as nets are committed to gaps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetList {
    nets: Vec<Net>,
}

impl NetList {
    pub fn new() -> Self {
        Self { nets: Vec::new() }
    }

    pub fn push(&mut self, net: Net) {
        self.nets.push(net);
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Net> {
        self.nets.iter()
    }

    pub fn remove(&mut self, id: NetId) -> Option<Net> {
        let pos = self.nets.iter().position(|n| n.id == id)?;
        Some(self.nets.remove(pos))
    }

    pub fn remove_all(&mut self, ids: &[NetId]) {
        let ids: HashSet<NetId> = ids.iter().copied().collect();
        self.nets.retain(|n| !ids.contains(&n.id));
    }

    /// Stable sort; nets with equal keys keep their relative order.
    pub fn sort_by_key<K: Ord>(&mut self, f: impl FnMut(&Net) -> K) {
        self.nets.sort_by_key(f);
    }

    pub fn unit_width_nets(&self) -> impl Iterator<Item = &Net> {
        self.nets.iter().filter(|n| n.is_unit_width())
    }

    pub fn n_pins(&self) -> usize {
        self.nets.iter().map(|n| n.pins.len()).sum()
    }

    pub fn horizontal_wirelength(&self) -> Decimal {
        self.nets.iter().map(|n| n.horizontal_wirelength()).sum()
    }

    /// Lower bound: the sum of every net's pin span in y.
    pub fn vertical_wirelength(&self) -> Decimal {
        self.nets.iter().map(|n| n.y_span()).sum()
    }

    pub fn max_width(&self) -> Option<&Net> {
        self.nets.iter().max_by_key(|n| n.width)
    }

    /// Maximum over all x of the total width of nets covering x.
    pub fn max_density(&self) -> Decimal {
        self.density_profile()
            .iter()
            .map(|step| step.at)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Maximal closed x-intervals where the density equals `max_density()`,
    /// left to right.
    pub fn max_density_zones(&self) -> Vec<Span> {
        let profile = self.density_profile();
        let max = match profile.iter().map(|step| step.at).max() {
            Some(m) => m,
            None => return Vec::new(),
        };

        let mut zones = Vec::new();
        let mut open: Option<Decimal> = None;
        for step in &profile {
            if open.is_none() && step.at == max {
                open = Some(step.x);
            }
            if let Some(start) = open {
                if step.after < max {
                    zones.push(Span::new(start, step.x));
                    open = None;
                }
            }
        }
        zones
    }

    /// Density at each event x and on the open interval right after it.
    /// Closed intervals: nets ending at x still cover x.
    fn density_profile(&self) -> Vec<DensityStep> {
        let mut events: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();
        for n in &self.nets {
            events.entry(n.minx()).or_default().0 += n.width;
            events.entry(n.maxx()).or_default().1 += n.width;
        }

        let mut running = Decimal::ZERO;
        events
            .into_iter()
            .map(|(x, (starts, ends))| {
                let at = running + starts;
                running = at - ends;
                DensityStep {
                    x,
                    at,
                    after: running,
                }
            })
            .collect()
    }
}

struct DensityStep {
    x: Decimal,
    at: Decimal,
    after: Decimal,
}

impl From<Vec<Net>> for NetList {
    fn from(nets: Vec<Net>) -> Self {
        Self { nets }
    }
}

impl FromIterator<Net> for NetList {
    fn from_iter<I: IntoIterator<Item = Net>>(iter: I) -> Self {
        Self {
            nets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NetList {
    type Item = &'a Net;
    type IntoIter = std::slice::Iter<'a, Net>;

    fn into_iter(self) -> Self::IntoIter {
        self.nets.iter()
    }
}

impl IntoIterator for NetList {
    type Item = Net;
    type IntoIter = std::vec::IntoIter<Net>;

    fn into_iter(self) -> Self::IntoIter {
        self.nets.into_iter()
    }
}
