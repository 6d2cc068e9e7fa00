mod test_deformation_basic;
mod test_mesh_sanity;
