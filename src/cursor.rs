use crate::{
    error::Error,
    schema::ElementDef,
};


/// Tracks which element section of a file is currently streamed and how many
/// of its instances were handled so far.
///
/// Element sections have to be handled in header order, each one completely.
/// Sections without instances may be skipped.
#[derive(Debug, Default)]
pub(crate) struct Cursor {
    /// Index of the first element that was not started yet.
    next: usize,
    current: Option<Current>,
}

#[derive(Debug, Clone, Copy)]
struct Current {
    index: usize,
    done: u64,
}

impl Cursor {
    /// Starts the element with the given index.
    pub(crate) fn begin(&mut self, elements: &[ElementDef], index: usize) -> Result<(), Error> {
        self.check_current_complete(elements)?;

        while self.next < index && elements[self.next].count == 0 {
            self.next += 1;
        }

        if index < self.next {
            return Err(sequencing_error!(
                "element '{}' was already handled",
                elements[index].name,
            ));
        }
        if index > self.next {
            return Err(sequencing_error!(
                "element '{}' requested, but element '{}' comes first",
                elements[index].name,
                elements[self.next].name,
            ));
        }

        self.current = Some(Current { index, done: 0 });
        self.next += 1;
        Ok(())
    }

    /// Registers one more instance of the element with the given index. Fails
    /// if that element is not the current one or all its instances were
    /// handled already.
    pub(crate) fn advance(&mut self, elements: &[ElementDef], index: usize) -> Result<(), Error> {
        let def = &elements[index];
        match &mut self.current {
            Some(current) if current.index == index => {
                if current.done >= def.count {
                    return Err(sequencing_error!(
                        "all {} instance(s) of element '{}' were already handled",
                        def.count,
                        def.name,
                    ));
                }

                current.done += 1;
                Ok(())
            }
            _ => Err(sequencing_error!("element '{}' is not the current element", def.name)),
        }
    }

    /// Number of instances of the element with the given index that are not
    /// handled yet.
    pub(crate) fn remaining(&self, elements: &[ElementDef], index: usize) -> u64 {
        match self.current {
            Some(current) if current.index == index => elements[index].count - current.done,
            _ if index >= self.next => elements[index].count,
            _ => 0,
        }
    }

    /// Returns `true` if an element was started but not all its instances
    /// were handled.
    pub(crate) fn is_partial(&self, elements: &[ElementDef]) -> bool {
        self.check_current_complete(elements).is_err()
    }

    /// Elements that were not started yet.
    pub(crate) fn untouched<'a>(&self, elements: &'a [ElementDef]) -> &'a [ElementDef] {
        &elements[self.next..]
    }

    /// Checks that every element with at least one instance was handled
    /// completely.
    pub(crate) fn check_finished(&self, elements: &[ElementDef]) -> Result<(), Error> {
        self.check_current_complete(elements)?;
        match self.untouched(elements).iter().find(|e| e.count > 0) {
            Some(e) => Err(sequencing_error!(
                "element '{}' with {} instance(s) was never handled",
                e.name,
                e.count,
            )),
            None => Ok(()),
        }
    }

    fn check_current_complete(&self, elements: &[ElementDef]) -> Result<(), Error> {
        if let Some(current) = self.current {
            let def = &elements[current.index];
            if current.done < def.count {
                return Err(sequencing_error!(
                    "only {} of {} instance(s) of element '{}' were handled",
                    current.done,
                    def.count,
                    def.name,
                ));
            }
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn elements() -> Vec<ElementDef> {
        vec![
            ElementDef::new("vertex", 2),
            ElementDef::new("material", 0),
            ElementDef::new("face", 1),
            ElementDef::new("edge", 0),
        ]
    }

    #[test]
    fn in_order() -> Result<(), failure::Error> {
        let elems = elements();
        let mut c = Cursor::default();

        assert!(c.check_finished(&elems).is_err());
        c.begin(&elems, 0)?;
        assert_eq!(c.remaining(&elems, 0), 2);
        c.advance(&elems, 0)?;
        assert!(c.is_partial(&elems));
        assert!(c.begin(&elems, 2).is_err());
        c.advance(&elems, 0)?;
        assert!(c.advance(&elems, 0).is_err());
        assert!(!c.is_partial(&elems));

        // The empty `material` element is skipped.
        c.begin(&elems, 2)?;
        assert_eq!(c.remaining(&elems, 2), 1);
        c.advance(&elems, 2)?;
        c.check_finished(&elems)?;
        assert_eq!(c.untouched(&elems).len(), 1);

        Ok(())
    }

    #[test]
    fn out_of_order() -> Result<(), failure::Error> {
        let elems = elements();
        let mut c = Cursor::default();

        match c.begin(&elems, 2) {
            Err(Error::SequencingError(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        c.begin(&elems, 0)?;
        c.advance(&elems, 0)?;
        c.advance(&elems, 0)?;
        assert!(c.begin(&elems, 0).is_err());
        assert!(c.advance(&elems, 2).is_err());

        Ok(())
    }
}
