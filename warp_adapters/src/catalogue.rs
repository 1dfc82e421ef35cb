//! The standard set of warps wrapped in adapters, ready to be tested.

use crate::{
  Argument, BoundingBox3, IdentityWarpAdapter, LineWarpAdapter, PlaneWarpAdapter,
  SphereWarpAdapter, WarpAdapter, WarpError,
};

/// Half extent of the region histogrammed for the standard normal.  Roughly 0.01% of the mass
/// falls outside of it.
const STD_NORMAL_HALF_EXTENT: f64 = 4.;

fn planar() -> Result<Vec<Box<dyn WarpAdapter>>, WarpError> {
  let adapters: Vec<Box<dyn WarpAdapter>> = vec![
    Box::new(PlaneWarpAdapter::new(
      "Uniform disk",
      |s, _| warp::square_to_uniform_disk(s),
      |p, _| warp::square_to_uniform_disk_pdf(p),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )?),
    Box::new(PlaneWarpAdapter::new(
      "Uniform disk (concentric)",
      |s, _| warp::square_to_uniform_disk_concentric(s),
      |p, _| warp::square_to_uniform_disk_concentric_pdf(p),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )?),
    Box::new(PlaneWarpAdapter::new(
      "Uniform triangle",
      |s, _| warp::square_to_uniform_triangle(s),
      |p, _| warp::square_to_uniform_triangle_pdf(p),
      Vec::new(),
      BoundingBox3::UNIT_SQUARE,
    )?),
    Box::new(PlaneWarpAdapter::new(
      "Standard normal",
      |s, _| warp::square_to_std_normal(s),
      |p, _| warp::square_to_std_normal_pdf(p),
      Vec::new(),
      BoundingBox3::centered(STD_NORMAL_HALF_EXTENT),
    )?),
    Box::new(PlaneWarpAdapter::new(
      "Tent",
      |s, _| warp::square_to_tent(s),
      |p, _| warp::square_to_tent_pdf(p),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )?),
  ];
  Ok(adapters)
}

fn linear() -> Result<Vec<Box<dyn WarpAdapter>>, WarpError> {
  let nonuniform_tent_args = vec![
    Argument::new("a", -1., -0.5, -1., "Lower end of the support")?,
    Argument::new("b", -0.4, 0.4, 0., "Mode")?,
    Argument::new("c", 0.5, 1., 1., "Upper end of the support")?,
  ];

  let adapters: Vec<Box<dyn WarpAdapter>> = vec![
    Box::new(LineWarpAdapter::new(
      "Tent (1D)",
      |x, _| warp::interval_to_tent(x),
      |x, _| warp::tent_pdf(x),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )?),
    Box::new(LineWarpAdapter::new(
      "Nonuniform tent",
      |x, args| warp::interval_to_nonuniform_tent(x, args[0], args[1], args[2]),
      |x, args| warp::nonuniform_tent_pdf(x, args[0], args[1], args[2]),
      nonuniform_tent_args,
      BoundingBox3::CENTERED_SQUARE,
    )?),
  ];
  Ok(adapters)
}

fn spherical() -> Result<Vec<Box<dyn WarpAdapter>>, WarpError> {
  let cone_args = vec![Argument::new(
    "cosCutoff",
    -1.,
    0.95,
    0.5,
    "Cosine of the cone's half-angle",
  )?];

  let adapters: Vec<Box<dyn WarpAdapter>> = vec![
    Box::new(SphereWarpAdapter::new(
      "Uniform sphere",
      |s, _| warp::square_to_uniform_sphere(s),
      |v, _| warp::square_to_uniform_sphere_pdf(v),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )?),
    Box::new(SphereWarpAdapter::new(
      "Uniform hemisphere",
      |s, _| warp::square_to_uniform_hemisphere(s),
      |v, _| warp::square_to_uniform_hemisphere_pdf(v),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )?),
    Box::new(SphereWarpAdapter::new(
      "Cosine hemisphere",
      |s, _| warp::square_to_cosine_hemisphere(s),
      |v, _| warp::square_to_cosine_hemisphere_pdf(v),
      Vec::new(),
      BoundingBox3::CENTERED_SQUARE,
    )?),
    Box::new(SphereWarpAdapter::new(
      "Uniform cone",
      |s, args| warp::square_to_uniform_cone(s, args[0]),
      |v, args| warp::square_to_uniform_cone_pdf(v, args[0]),
      cone_args,
      BoundingBox3::CENTERED_SQUARE,
    )?),
  ];
  Ok(adapters)
}

/// Every standard warp, starting with the identity control.
pub fn standard_adapters() -> Result<Vec<Box<dyn WarpAdapter>>, WarpError> {
  let mut adapters: Vec<Box<dyn WarpAdapter>> = vec![Box::new(IdentityWarpAdapter::new())];
  adapters.extend(planar()?);
  adapters.extend(linear()?);
  adapters.extend(spherical()?);
  Ok(adapters)
}

/// Looks up a standard adapter by its exact name.
pub fn find_adapter(name: &str) -> Result<Option<Box<dyn WarpAdapter>>, WarpError> {
  Ok(
    standard_adapters()?
      .into_iter()
      .find(|adapter| adapter.name() == name),
  )
}
