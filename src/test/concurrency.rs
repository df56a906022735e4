use crate::{
    characterizer::Options,
    check::CheckKind,
    engine::Gateway,
    input::Input,
    test::{
        engine::{Scripted, Trace},
        get_stress_iterations_count,
        usecase::*,
    },
    E,
};
use std::{fs::File, sync::Arc, thread};

#[test]
fn independent_inputs() -> Result<(), E> {
    let usecase = UseCase::random(12)?;
    let trace = Trace::default();
    let gateway = Arc::new(Gateway::new(Scripted::new(&trace).slow()));
    let characterizer = Options::with_gateway(gateway).build()?;
    let handles = usecase
        .files
        .iter()
        .cloned()
        .enumerate()
        .map(|(n, path)| {
            let characterizer = characterizer.clone();
            thread::spawn(move || -> Result<(), E> {
                let len = n + 1;
                for _ in 0..get_stress_iterations_count() {
                    let mut stream = Input::stream(File::open(&path)?);
                    let report = characterizer.characterize_many(CheckKind::ALL, &mut stream)?;
                    for kind in CheckKind::ALL {
                        assert_eq!(report.get(&kind), Some(&format!("{kind}:buffer:{len}")));
                    }
                    let mut file = Input::path(&path)?;
                    assert_eq!(
                        characterizer.check_text(&mut file)?,
                        format!("text:path:{}", path.display())
                    );
                }
                Ok(())
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle
            .join()
            .map_err(|e| E::PoisonError(format!("{e:?}")))??;
    }
    assert_eq!(trace.overlaps(), 0);
    assert_eq!(trace.calls(), usecase.files.len() * get_stress_iterations_count() * 4);
    usecase.clean()?;
    Ok(())
}
