//! Vertices of the Voronoi diagram of a set of integer sites, computed with Fortune's
//! sweep-line algorithm.
//!
//! The sweep line moves over increasing y. Processed sites define a beach line of parabolic
//! arcs, kept in [`beachline::Beachline`]. Site events split arcs, circle events squeeze them
//! out of the beach line, and every squeezed arc gives a vertex of the diagram.

use std::cmp::Ordering;

pub mod beachline;
mod error;
pub mod geometry;
mod heap;

use beachline::{Beachline, NodeId};
pub use error::Error;
pub use geometry::{Circle, Rect, Site, Vertex};
use heap::Heap;
pub use heap::Handle;


#[doc(hidden)]
pub use tracing as __tracing;

#[macro_export]
macro_rules! debugln {
    ($($arg:tt)*) => {
        $crate::__tracing::trace!($($arg)*)
    };
}

pub type SiteIdx = u32;

#[derive(PartialEq, Debug, Clone)]
pub enum Event {
    /// A site, reached when the sweep line passes over it.
    Site(SiteIdx, Site),
    /// The moment three consecutive arcs meet at a point.
    Circle(CircleEvent),
}

#[derive(PartialEq, Debug, Clone)]
pub struct CircleEvent {
    /// The y of the lowest point of the circle.
    pub key: f64,
    /// The circle through the sites of the arc and its two neighbors.
    pub circle: Circle,
    /// The center of the circle, a vertex of the diagram.
    pub vertex: Vertex,
    /// The arc that is squeezed out.
    pub arc: NodeId,
}

impl Event {
    /// The sweep coordinate at which this event happens.
    pub fn key(&self) -> f64 {
        match self {
            Event::Site(_, site) => site.y as f64,
            Event::Circle(c) => c.key,
        }
    }

    /// The order of the event queue: by key, sites before circles, and sites on the same line
    /// from left to right.
    fn priority_cmp(a: &Event, b: &Event) -> Ordering {
        a.key().total_cmp(&b.key()).then_with(|| match (a, b) {
            (Event::Site(i, p), Event::Site(j, q)) => p.x.cmp(&q.x).then(i.cmp(j)),
            (Event::Site(..), Event::Circle(_)) => Ordering::Less,
            (Event::Circle(_), Event::Site(..)) => Ordering::Greater,
            (Event::Circle(c), Event::Circle(d)) => c.arc.cmp(&d.arc),
        })
    }
}

type EventQueue = Heap<Event, fn(&Event, &Event) -> Ordering>;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum State {
    /// Constructed, but never reset.
    Uninitialized,
    /// There are events left to process.
    Running,
    /// All events were processed.
    Drained,
}

/// What a single [`Voronoi::step`] did.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Step {
    /// A site was added to the beach line.
    Site(Site),
    /// An arc was squeezed out of the beach line at this vertex.
    Circle(Vertex),
    /// The event was obsolete and was discarded.
    Stale,
    /// There were no events left.
    Drained,
}

/// Fortune's algorithm, one event at a time.
///
/// Based on the description of the algorithm in "A sweepline algorithm for Voronoi diagrams"
/// by Steven Fortune, with the beach line kept as a tree of arcs and breakpoints.
///
/// The engine only computes the vertices of the diagram. Each engine owns all of its state, so
/// independent diagrams can be computed at the same time with independent engines.
pub struct Voronoi {
    bounds: Rect,
    sites: Vec<Site>,
    events: EventQueue,
    beachline: Beachline,
    /// The current position of the sweep line. It never decreases.
    sweep: f64,
    state: State,
    vertices: Vec<Vertex>,
    split_points: Vec<Vertex>,
    /// The sweep coordinate of the last circle event, and the circles resolved there.
    resolved: (f64, Vec<Circle>),
}
impl Voronoi {
    pub fn new(sites: &[Site], bounds: Rect) -> Self {
        Self {
            bounds,
            sites: sites.to_vec(),
            events: Heap::new(Event::priority_cmp as fn(&Event, &Event) -> Ordering),
            beachline: Beachline::new(),
            sweep: f64::NEG_INFINITY,
            state: State::Uninitialized,
            vertices: Vec::new(),
            split_points: Vec::new(),
            resolved: (f64::NEG_INFINITY, Vec::new()),
        }
    }

    /// Build an engine from anything that converts to sites, like `(x, y)` tuples.
    pub fn from_points<P: Into<Site>>(points: impl IntoIterator<Item = P>, bounds: Rect) -> Self {
        let sites = points.into_iter().map(Into::into).collect::<Vec<_>>();
        Self::new(&sites, bounds)
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The vertices found so far, in the order they were resolved.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The points where each new arc first touched the arc above it, in the order the sites
    /// were reached. These are where the edges between the two sites start to be traced.
    pub fn split_points(&self) -> &[Vertex] {
        &self.split_points
    }

    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn beachline(&self) -> &Beachline {
        &self.beachline
    }

    /// The event that the next step will process.
    pub fn next_event(&self) -> Option<&Event> {
        self.events.peek()
    }

    /// The events still waiting in the queue.
    pub fn pending_events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().map(|(_, e)| e)
    }

    /// Put every site back in the event queue and forget everything else.
    pub fn reset(&mut self) {
        self.events.clear();
        for (i, site) in self.sites.iter().enumerate() {
            self.events.push(Event::Site(i as SiteIdx, *site));
        }
        self.beachline.clear();
        self.vertices.clear();
        self.split_points.clear();
        self.resolved = (f64::NEG_INFINITY, Vec::new());
        self.sweep = f64::NEG_INFINITY;
        self.state = if self.events.is_empty() {
            State::Drained
        } else {
            State::Running
        };
    }

    /// Compute the diagram from scratch.
    pub fn generate(&mut self) -> Result<&[Vertex], Error> {
        self.reset();
        self.run_to_completion()
    }

    pub fn run_to_completion(&mut self) -> Result<&[Vertex], Error> {
        while self.step()? != Step::Drained {}
        Ok(&self.vertices)
    }

    /// Process the next event.
    pub fn step(&mut self) -> Result<Step, Error> {
        if self.state == State::Uninitialized {
            return Err(Error::Uninitialized);
        }

        let Some(event) = self.events.pop() else {
            self.state = State::Drained;
            return Ok(Step::Drained);
        };

        let key = event.key();
        let step = if key < self.sweep {
            tracing::warn!(
                "discarding event {:?} behind the sweep line at {} ({} events left)",
                event,
                self.sweep,
                self.events.len()
            );
            Step::Stale
        } else {
            self.sweep = key;
            match event {
                Event::Site(idx, site) => {
                    self.handle_site(idx, site)?;
                    Step::Site(site)
                }
                Event::Circle(circle) => self.handle_circle(circle)?,
            }
        };

        if self.events.is_empty() {
            self.state = State::Drained;
        }
        Ok(step)
    }

    fn handle_site(&mut self, idx: SiteIdx, site: Site) -> Result<(), Error> {
        debugln!("site event {:?} at {}: {:?}", site, self.sweep, self.beachline);

        if self.beachline.is_empty() {
            self.beachline.insert_root(idx)?;
            return Ok(());
        }

        let above = self.beachline.find_arc_above(&self.sites, site.x, self.sweep)?;
        // The neighborhood of the arc above is about to change.
        self.cancel_events(above);

        let above_site = self.site_of(above)?;
        let new = match geometry::parabola_y(above_site, site.x as f64, self.sweep) {
            Some(y) => {
                let touch = Vertex::round(site.x as f64, y);
                debugln!("{:?} touches {:?} at {:?}", site, above_site, touch);
                self.split_points.push(touch);
                self.beachline.split(above, idx)?
            }
            // the arc above belongs to a site on the sweep line too
            None => self.beachline.split_beside(&self.sites, above, idx)?,
        };

        if let Some(prev) = self.beachline.prev_arc(new) {
            let prev_prev = self.beachline.prev_arc(prev);
            self.schedule_circle(prev_prev, Some(prev), Some(new))?;
        }
        if let Some(next) = self.beachline.next_arc(new) {
            let next_next = self.beachline.next_arc(next);
            self.schedule_circle(Some(new), Some(next), next_next)?;
        }

        Ok(())
    }

    fn handle_circle(&mut self, circle: CircleEvent) -> Result<Step, Error> {
        debugln!("circle event {:?} at {}: {:?}", circle, self.sweep, self.beachline);

        if !self.beachline.is_leaf(circle.arc) {
            tracing::warn!("discarding circle event {:?} of a removed arc", circle);
            return Ok(Step::Stale);
        }

        // This event happens first, the others of this arc can't happen anymore.
        self.cancel_events(circle.arc);

        let tolerance = geometry::tolerance(self.sweep);
        let (at, resolved) = &mut self.resolved;
        if (*at - self.sweep).abs() > tolerance {
            *at = self.sweep;
            resolved.clear();
        }

        // With more than three sites on the same circle, each arc squeezed between them gives
        // the same vertex, possibly interleaved with other events at the same sweep.
        if resolved.iter().any(|c| c.same_center(&circle.circle, tolerance)) {
            debugln!("merging coincident vertex {:?}", circle.vertex);
        } else {
            tracing::debug!("vertex {:?} at {}", circle.vertex, self.sweep);
            resolved.push(circle.circle);
            self.vertices.push(circle.vertex);
        }

        let (left, right) = self.beachline.remove(circle.arc)?;

        // The neighbors have new neighbors now, so their old circles are gone.
        for arc in [left, right].into_iter().flatten() {
            self.cancel_events(arc);
        }

        if let (Some(left), Some(right)) = (left, right) {
            let left_left = self.beachline.prev_arc(left);
            self.schedule_circle(left_left, Some(left), Some(right))?;
            let right_right = self.beachline.next_arc(right);
            self.schedule_circle(Some(left), Some(right), right_right)?;
        }

        Ok(Step::Circle(circle.vertex))
    }

    /// Check if the three consecutive arcs will meet, and if so push the circle event that
    /// squeezes the middle one.
    fn schedule_circle(
        &mut self,
        left: Option<NodeId>,
        middle: Option<NodeId>,
        right: Option<NodeId>,
    ) -> Result<Option<Handle>, Error> {
        let (Some(left), Some(middle), Some(right)) = (left, middle, right) else {
            return Ok(None);
        };

        let (a, b, c) = (
            self.site_of(left)?,
            self.site_of(middle)?,
            self.site_of(right)?,
        );
        let Some((circle, key)) = geometry::circle_event(a, b, c, self.sweep) else {
            debugln!("no circle for {:?} {:?} {:?}", a, b, c);
            return Ok(None);
        };

        if !circle.center_fits() {
            tracing::debug!(
                "center of {:?} {:?} {:?} at {:?} is out of range, its vertex saturates",
                a,
                b,
                c,
                (circle.x, circle.y)
            );
        }

        let handle = self.events.push(Event::Circle(CircleEvent {
            key,
            circle,
            vertex: circle.center(),
            arc: middle,
        }));
        self.beachline.attach_event(middle, handle)?;

        tracing::debug!(
            "circle of {:?} {:?} {:?} centered at {:?}, at {}",
            a,
            b,
            c,
            circle.center(),
            key
        );
        Ok(Some(handle))
    }

    fn cancel_events(&mut self, arc: NodeId) {
        for handle in self.beachline.take_events(arc) {
            if let Some(event) = self.events.cancel(handle) {
                debugln!("cancelled {:?}", event);
            }
        }
    }

    fn site_of(&self, arc: NodeId) -> Result<Site, Error> {
        let idx = self.beachline.site(arc).ok_or(Error::NotAnArc(arc))?;
        Ok(self.sites[idx as usize])
    }
}

/// Compute the vertices of the Voronoi diagram of `sites`, calling `on_progress` after every
/// event.
pub fn fortune_algorithm(
    sites: &[Site],
    on_progress: &mut impl FnMut(&Voronoi),
) -> Result<Vec<Vertex>, Error> {
    let mut voronoi = Voronoi::new(sites, Rect::enclosing(sites));
    voronoi.reset();
    on_progress(&voronoi);

    while voronoi.step()? != Step::Drained {
        on_progress(&voronoi);
    }

    Ok(voronoi.vertices)
}
