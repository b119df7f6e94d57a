use std::rc::Rc;

use tiny_skia::Pixmap;

/// Anything that can be painted onto a frame.
pub trait Drawable {
    fn draw(&self, canvas: &mut Pixmap);
}

impl<D: Drawable + ?Sized> Drawable for Box<D> {
    fn draw(&self, canvas: &mut Pixmap) {
        (**self).draw(canvas)
    }
}

impl<D: Drawable + ?Sized> Drawable for Rc<D> {
    fn draw(&self, canvas: &mut Pixmap) {
        (**self).draw(canvas)
    }
}

/// What a scene setup hands back: one drawable or a collection.
pub enum Stimuli {
    Single(Box<dyn Drawable>),
    Many(Vec<Box<dyn Drawable>>),
}

impl Stimuli {
    pub fn one(drawable: impl Drawable + 'static) -> Self {
        Stimuli::Single(Box::new(drawable))
    }

    pub fn many(drawables: Vec<Box<dyn Drawable>>) -> Self {
        Stimuli::Many(drawables)
    }

    pub fn none() -> Self {
        Stimuli::Many(Vec::new())
    }

    pub fn into_vec(self) -> Vec<Box<dyn Drawable>> {
        match self {
            Stimuli::Single(drawable) => vec![drawable],
            Stimuli::Many(drawables) => drawables,
        }
    }
}

impl From<Box<dyn Drawable>> for Stimuli {
    fn from(drawable: Box<dyn Drawable>) -> Self {
        Stimuli::Single(drawable)
    }
}

impl From<Vec<Box<dyn Drawable>>> for Stimuli {
    fn from(drawables: Vec<Box<dyn Drawable>>) -> Self {
        Stimuli::Many(drawables)
    }
}

impl std::fmt::Debug for Stimuli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stimuli::Single(_) => f.write_str("Stimuli::Single"),
            Stimuli::Many(d) => write!(f, "Stimuli::Many({})", d.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot;

    impl Drawable for Dot {
        fn draw(&self, canvas: &mut Pixmap) {
            canvas.fill(tiny_skia::Color::WHITE);
        }
    }

    #[test]
    fn single_normalises_to_one_element() {
        assert_eq!(Stimuli::one(Dot).into_vec().len(), 1);
        assert_eq!(Stimuli::none().into_vec().len(), 0);
        let many: Stimuli = vec![Box::new(Dot) as Box<dyn Drawable>, Box::new(Dot)].into();
        assert_eq!(many.into_vec().len(), 2);
    }
}
