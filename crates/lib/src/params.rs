//! ML-DSA matrix shapes. MlDsaParams trait and marker types MlDsa44,
//! MlDsa65, MlDsa87.

pub use rej_math::{N, Q, SEEDBYTES};

/// Public matrix `A` in row-major order: `K` rows of `L` polynomials.
pub type Matrix<const K: usize, const L: usize> = [[[i32; N]; L]; K];

/// ML-DSA parameter set, as far as `ExpandA` is concerned.
pub trait MlDsaParams: 'static {
    /// Rows of `A` (dimension of `t`).
    const K: usize;
    /// Columns of `A` (dimension of `s1`).
    const L: usize;

    /// Backing array for the expanded matrix.
    type Matrix;

    /// Expand `rho` into `A` with the process-wide backend.
    fn expand_a(rho: &[u8; SEEDBYTES]) -> Self::Matrix;

    /// Entries of `A` in row-major order.
    fn polys(a: &Self::Matrix) -> impl Iterator<Item = &[i32; N]>;
}

macro_rules! mldsa_params {
    ($($(#[$meta:meta])* $name:ident: $k:literal x $l:literal),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl MlDsaParams for $name {
                const K: usize = $k;
                const L: usize = $l;

                type Matrix = Matrix<$k, $l>;

                fn expand_a(rho: &[u8; SEEDBYTES]) -> Self::Matrix {
                    crate::expand::expand_a::<$k, $l>(rho)
                }

                fn polys(a: &Self::Matrix) -> impl Iterator<Item = &[i32; N]> {
                    a.iter().flatten()
                }
            }
        )*
    };
}

mldsa_params!(
    /// ML-DSA-44 (NIST security category 2).
    MlDsa44: 4 x 4,
    /// ML-DSA-65 (NIST security category 3).
    MlDsa65: 6 x 5,
    /// ML-DSA-87 (NIST security category 5).
    MlDsa87: 8 x 7,
);

const _: () = {
    macro_rules! check_params {
        ($t:ty) => {
            assert!(<$t>::K >= <$t>::L);
            assert!(<$t>::K <= 8 && <$t>::L <= 8);
        };
    }
    check_params!(MlDsa44);
    check_params!(MlDsa65);
    check_params!(MlDsa87);
};
