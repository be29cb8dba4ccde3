use crate::data::*;
use crate::generators::core::*;

// Each component is drawn from its own split of the source, and the trees
// are zipped left to right, so shrinks try the leftmost component first.
macro_rules! tuple_generator_impl {
    ($n:expr; $nested:tt; $gen_a:ident: $var_a:ident: $type_a:ident
        $(, $gen_n:ident: $var_n:ident: $type_n:ident)*) => (
        impl<$type_a: Generator, $($type_n: Generator),*> Generator
                for ($type_a, $($type_n),*) {
                    type Item = ($type_a::Item, $($type_n::Item),*);
                    fn generate(&self, src: RandomSource, size: usize)
                            -> Maybe<ShrinkTree<Self::Item>> {
                        let &(ref $gen_a, $(ref $gen_n),*) = self;
                        let srcs = src.split_n($n);
                        let mut idx = 0;
                        let mut next = || {
                            idx += 1;
                            srcs[idx - 1]
                        };
                        let tree = $gen_a.generate(next(), size)?;
                        $(let tree = tree.zip($gen_n.generate(next(), size)?);)*
                        Ok(tree.map(|$nested| ($var_a, $($var_n),*)))
                    }
                }
    );
}

tuple_generator_impl!(1; a; ga: a: A);
tuple_generator_impl!(2; (a, b); ga: a: A, gb: b: B);
tuple_generator_impl!(3; ((a, b), c); ga: a: A, gb: b: B, gc: c: C);
tuple_generator_impl!(4; (((a, b), c), d); ga: a: A, gb: b: B, gc: c: C, gd: d: D);
tuple_generator_impl!(
    5;
    ((((a, b), c), d), e);
    ga: a: A,
    gb: b: B,
    gc: c: C,
    gd: d: D,
    ge: e: E
);
tuple_generator_impl!(
    6;
    (((((a, b), c), d), e), f);
    ga: a: A,
    gb: b: B,
    gc: c: C,
    gd: d: D,
    ge: e: E,
    gf: f: F
);
tuple_generator_impl!(
    7;
    ((((((a, b), c), d), e), f), g);
    ga: a: A,
    gb: b: B,
    gc: c: C,
    gd: d: D,
    ge: e: E,
    gf: f: F,
    gg: g: G
);
tuple_generator_impl!(
    8;
    (((((((a, b), c), d), e), f), g), h);
    ga: a: A,
    gb: b: B,
    gc: c: C,
    gd: d: D,
    ge: e: E,
    gf: f: F,
    gg: g: G,
    gh: h: H
);

#[cfg(test)]
mod tests {
    use crate::data::*;
    use crate::generators::core::tests::*;
    use crate::generators::*;

    #[test]
    fn pairs_should_generate_same_output_given_same_input() {
        should_generate_same_output_given_same_input((choose(0, 10), choose(-10, 0)))
    }

    #[test]
    fn triples_usually_generate_different_output_for_different_inputs() {
        usually_generates_different_output_for_different_inputs((
            choose(0, 1000),
            pure("x"),
            choose(0, 1000),
        ))
    }

    #[test]
    fn components_draw_from_split_sources() {
        let src = RandomSource::make(77);
        let srcs = src.split_n(3);
        let (a, b, c) = (choose(0, 1 << 40), choose(0, 1 << 40), choose(0, 1 << 40))
            .generate(src, 5)
            .expect("triple")
            .into_value();
        let expected = srcs
            .iter()
            .map(|&s| choose(0, 1 << 40).generate(s, 5).expect("one").into_value())
            .collect::<Vec<_>>();
        assert_eq!(vec![a, b, c], expected);
    }

    #[test]
    fn single_component_uses_the_source_directly() {
        let src = RandomSource::make(4);
        let (v,) = (choose(0, 1 << 40),).generate(src, 0).expect("one").into_value();
        assert_eq!(v, choose(0, 1 << 40).generate(src, 0).expect("plain").into_value());
    }

    #[test]
    fn shrinks_leftmost_component_first() {
        let gen = (choose(1, 100), choose(1, 100));
        for src in sources(30) {
            let tree = gen.generate(src, 10).expect("pair");
            let (a, b) = *tree.value();
            let kids = roots(&tree);
            let split = kids.iter().position(|&(_, kb)| kb != b).unwrap_or(kids.len());
            assert!(kids[..split].iter().all(|&(ka, kb)| ka < a && kb == b));
            assert!(kids[split..].iter().all(|&(ka, kb)| ka == a && kb < b));
        }
    }

    #[test]
    fn wide_tuples_generate() {
        let gen = (
            pure(1),
            pure(2),
            pure(3),
            pure(4),
            pure(5),
            pure(6),
            pure(7),
            choose(8, 8),
        );
        let v = gen.generate(RandomSource::make(0), 0).expect("eight").into_value();
        assert_eq!(v, (1, 2, 3, 4, 5, 6, 7, 8));
    }
}
