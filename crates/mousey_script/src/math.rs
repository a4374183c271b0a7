//! `Mousey.Vector2` and `Mousey.Rect2` value types.
//!
//! Both are plain copies on the Rust side; every Lua operation that yields a
//! new value allocates fresh userdata, so scripts never alias engine memory.

use glam::DVec2;
use mlua::prelude::*;
use mlua::FromLua;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2(pub DVec2);

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalized(self) -> Self {
        Self(self.0.normalize_or_zero())
    }

    pub fn dot(self, other: Self) -> f64 {
        self.0.dot(other.0)
    }

    /// z component of the 3D cross product.
    pub fn cross(self, other: Self) -> f64 {
        self.0.perp_dot(other.0)
    }

    /// Projection onto `onto`. Projecting onto the zero vector yields NaN
    /// components, as the division is left unguarded.
    pub fn project(self, onto: Self) -> Self {
        let scale = self.dot(onto) / onto.0.length_squared();
        Self(onto.0 * scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect2 {
    pub position: DVec2,
    pub size: DVec2,
}

impl Rect2 {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            size: DVec2::new(width, height),
        }
    }

    fn end(&self) -> DVec2 {
        self.position + self.size
    }

    /// Touching edges count as overlapping.
    pub fn overlaps(&self, other: &Rect2) -> bool {
        self.position.x <= other.end().x
            && self.end().x >= other.position.x
            && self.position.y <= other.end().y
            && self.end().y >= other.position.y
    }

    /// Overlapping region, or the empty rect at the origin when the two do not
    /// overlap.
    pub fn intersect(&self, other: &Rect2) -> Rect2 {
        if !self.overlaps(other) {
            return Rect2::default();
        }
        let min = self.position.max(other.position);
        let max = self.end().min(other.end());
        Rect2 {
            position: min,
            size: max - min,
        }
    }

    /// Smallest rect containing both.
    pub fn union(&self, other: &Rect2) -> Rect2 {
        let min = self.position.min(other.position);
        let max = self.end().max(other.end());
        Rect2 {
            position: min,
            size: max - min,
        }
    }
}

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

pub fn rad_to_deg(radians: f64) -> f64 {
    radians.to_degrees()
}

fn expected(what: &str, value: &LuaValue) -> LuaError {
    LuaError::runtime(format!("expected {}, got {}", what, value.type_name()))
}

impl FromLua for Vector2 {
    fn from_lua(value: LuaValue, _: &Lua) -> LuaResult<Self> {
        match &value {
            LuaValue::UserData(ud) if ud.is::<Vector2>() => Ok(*ud.borrow::<Vector2>()?),
            _ => Err(expected("Vector2", &value)),
        }
    }
}

impl FromLua for Rect2 {
    fn from_lua(value: LuaValue, _: &Lua) -> LuaResult<Self> {
        match &value {
            LuaValue::UserData(ud) if ud.is::<Rect2>() => Ok(*ud.borrow::<Rect2>()?),
            _ => Err(expected("Rect2", &value)),
        }
    }
}

fn as_number(value: &LuaValue) -> Option<f64> {
    match value {
        LuaValue::Integer(i) => Some(*i as f64),
        LuaValue::Number(n) => Some(*n),
        _ => None,
    }
}

/// `vector * k` and `k * vector`.
fn scale(lua: &Lua, a: LuaValue, b: LuaValue) -> LuaResult<Vector2> {
    if let Some(k) = as_number(&b) {
        let v = Vector2::from_lua(a, lua)?;
        return Ok(Vector2(v.0 * k));
    }
    if let Some(k) = as_number(&a) {
        let v = Vector2::from_lua(b, lua)?;
        return Ok(Vector2(v.0 * k));
    }
    Err(expected("number", &b))
}

impl LuaUserData for Vector2 {
    fn add_fields<F: LuaUserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("x", |_, this| Ok(this.0.x));
        fields.add_field_method_set("x", |_, this, x: f64| {
            this.0.x = x;
            Ok(())
        });
        fields.add_field_method_get("y", |_, this| Ok(this.0.y));
        fields.add_field_method_set("y", |_, this, y: f64| {
            this.0.y = y;
            Ok(())
        });
    }

    fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("normalized", |_, this, ()| Ok(this.normalized()));
        methods.add_method("dot", |_, this, other: Vector2| Ok(this.dot(other)));
        methods.add_method("cross", |_, this, other: Vector2| Ok(this.cross(other)));
        methods.add_method("project", |_, this, onto: Vector2| Ok(this.project(onto)));

        methods.add_meta_method(LuaMetaMethod::Add, |_, this, other: Vector2| {
            Ok(Vector2(this.0 + other.0))
        });
        methods.add_meta_method(LuaMetaMethod::Sub, |_, this, other: Vector2| {
            Ok(Vector2(this.0 - other.0))
        });
        methods.add_meta_function(LuaMetaMethod::Mul, |lua, (a, b): (LuaValue, LuaValue)| {
            scale(lua, a, b)
        });
        methods.add_meta_method(LuaMetaMethod::Div, |_, this, k: f64| Ok(Vector2(this.0 / k)));
        methods.add_meta_method(LuaMetaMethod::Unm, |_, this, ()| Ok(Vector2(-this.0)));
        methods.add_meta_method(LuaMetaMethod::Eq, |_, this, other: Vector2| Ok(*this == other));
        methods.add_meta_method(LuaMetaMethod::ToString, |_, this, ()| {
            Ok(format!("Vector2({}, {})", this.0.x, this.0.y))
        });
    }
}

impl LuaUserData for Rect2 {
    fn add_fields<F: LuaUserDataFields<Self>>(fields: &mut F) {
        fields.add_field_method_get("position", |_, this| Ok(Vector2(this.position)));
        fields.add_field_method_set("position", |_, this, v: Vector2| {
            this.position = v.0;
            Ok(())
        });
        fields.add_field_method_get("size", |_, this| Ok(Vector2(this.size)));
        fields.add_field_method_set("size", |_, this, v: Vector2| {
            this.size = v.0;
            Ok(())
        });
    }

    fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("intersect", |_, this, other: Rect2| Ok(this.intersect(&other)));
        methods.add_method("union", |_, this, other: Rect2| Ok(this.union(&other)));
        methods.add_meta_method(LuaMetaMethod::Eq, |_, this, other: Rect2| Ok(*this == other));
        methods.add_meta_method(LuaMetaMethod::ToString, |_, this, ()| {
            Ok(format!(
                "Rect2({}, {}, {}, {})",
                this.position.x, this.position.y, this.size.x, this.size.y
            ))
        });
    }
}

/// `Vector2()`, `Vector2(other)` or `Vector2(x, y)`.
pub fn construct_vector2(lua: &Lua, args: LuaMultiValue) -> LuaResult<Vector2> {
    let args: Vec<LuaValue> = args.into_iter().collect();
    match args.as_slice() {
        [] => Ok(Vector2::default()),
        [other] => Vector2::from_lua(other.clone(), lua),
        [x, y] => Ok(Vector2::new(f64::from_lua(x.clone(), lua)?, f64::from_lua(y.clone(), lua)?)),
        _ => Err(LuaError::runtime("Vector2 takes 0, 1 or 2 arguments")),
    }
}

/// `Rect2()`, `Rect2(other)`, `Rect2(position, size)` or `Rect2(x, y, w, h)`.
pub fn construct_rect2(lua: &Lua, args: LuaMultiValue) -> LuaResult<Rect2> {
    let args: Vec<LuaValue> = args.into_iter().collect();
    match args.as_slice() {
        [] => Ok(Rect2::default()),
        [other] => Rect2::from_lua(other.clone(), lua),
        [position, size] => Ok(Rect2 {
            position: Vector2::from_lua(position.clone(), lua)?.0,
            size: Vector2::from_lua(size.clone(), lua)?.0,
        }),
        [x, y, w, h] => Ok(Rect2::new(
            f64::from_lua(x.clone(), lua)?,
            f64::from_lua(y.clone(), lua)?,
            f64::from_lua(w.clone(), lua)?,
            f64::from_lua(h.clone(), lua)?,
        )),
        _ => Err(LuaError::runtime("Rect2 takes 0, 1, 2 or 4 arguments")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_keeps_zero() {
        assert_eq!(Vector2::default().normalized(), Vector2::default());
        let n = Vector2::new(3.0, 4.0).normalized();
        assert!((n.0.x - 0.6).abs() < 1e-12 && (n.0.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_dot_cross_project() {
        let a = Vector2::new(2.0, 3.0);
        let b = Vector2::new(4.0, -1.0);
        assert_eq!(a.dot(b), 5.0);
        assert_eq!(a.cross(b), -14.0);
        assert_eq!(Vector2::new(3.0, 3.0).project(Vector2::new(2.0, 0.0)), Vector2::new(3.0, 0.0));
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = Rect2::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect2::new(5.0, 2.0, 10.0, 4.0);
        assert_eq!(a.intersect(&b), Rect2::new(5.0, 2.0, 5.0, 4.0));
        assert_eq!(b.intersect(&a), a.intersect(&b));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect2::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect2::new(5.0, 5.0, 1.0, 1.0);
        assert_eq!(a.intersect(&b), Rect2::default());
    }

    #[test]
    fn test_touching_edges_give_zero_width_intersection() {
        let a = Rect2::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect2::new(2.0, 0.0, 2.0, 2.0);
        assert!(a.overlaps(&b));
        assert_eq!(a.intersect(&b), Rect2::new(2.0, 0.0, 0.0, 2.0));
    }

    #[test]
    fn test_union_bounds_both() {
        let a = Rect2::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect2::new(5.0, -1.0, 1.0, 1.0);
        assert_eq!(a.union(&b), Rect2::new(0.0, -1.0, 6.0, 3.0));
    }

    #[test]
    fn test_angle_conversion() {
        assert!((deg_to_rad(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((rad_to_deg(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
    }
}
